//! Pin trait abstraction for pluggable GPIO backends

use pushbutton_shared::Level;

/// A digital input that can be sampled
pub trait DigitalInput: Send + 'static {
    /// Read the current level of the pin
    fn read(&mut self) -> Level;
}

/// A digital output that can be driven
pub trait DigitalOutput: Send + 'static {
    /// Drive the pin to `level`
    fn write(&mut self, level: Level);
}
