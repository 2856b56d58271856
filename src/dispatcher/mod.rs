//! Event dispatcher
//!
//! Consumes Start/Stop events from every source, owns the single command
//! invocation and picks the LED pattern for each transition.

mod event_loop;

#[cfg(test)]
mod scenarios;

pub use event_loop::Dispatcher;
