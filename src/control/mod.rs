//! Remote control surface
//!
//! Bare HTTP triggers that inject the same events as the button.

mod http;

pub use http::{router, serve};
