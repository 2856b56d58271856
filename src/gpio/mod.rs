//! Digital I/O capability
//!
//! The daemon only needs two boolean pins: a polled button input and an
//! LED output. Each pin is owned by exactly one task.

mod rpi;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use rpi::{open_pins, GpioButton, GpioLed};
pub use traits::{DigitalInput, DigitalOutput};
