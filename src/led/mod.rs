//! Indicator LED
//!
//! Runs the blink cycle on the output pin. The dispatcher only ever sends
//! whole patterns; toggle timing lives entirely in the blink task.

mod blinker;

pub use blinker::{spawn_blinker, BlinkController, BlinkHandle};
