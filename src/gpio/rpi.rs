//! Raspberry Pi GPIO backend (BCM pin numbering)

use super::traits::{DigitalInput, DigitalOutput};
use anyhow::{Context, Result};
use pushbutton_shared::Level;
use rppal::gpio::{self, Gpio, InputPin, OutputPin};
use tracing::info;

/// Push-button wired to an input pin (active high)
pub struct GpioButton {
    pin: InputPin,
}

/// Indicator LED wired to an output pin
pub struct GpioLed {
    pin: OutputPin,
}

/// Acquire the button and LED pins.
///
/// Failure here is fatal for the daemons: without the pins there is
/// nothing to control.
pub fn open_pins(button_pin: u8, led_pin: u8) -> Result<(GpioButton, GpioLed)> {
    let gpio = Gpio::new().context("failed to open GPIO peripheral")?;

    let button = gpio
        .get(button_pin)
        .with_context(|| format!("failed to acquire button pin {}", button_pin))?
        .into_input();

    let mut led = gpio
        .get(led_pin)
        .with_context(|| format!("failed to acquire LED pin {}", led_pin))?
        .into_output();
    led.set_low();

    info!("[GPIO] button on BCM {}, LED on BCM {}", button_pin, led_pin);
    Ok((GpioButton { pin: button }, GpioLed { pin: led }))
}

impl DigitalInput for GpioButton {
    fn read(&mut self) -> Level {
        match self.pin.read() {
            gpio::Level::High => Level::High,
            gpio::Level::Low => Level::Low,
        }
    }
}

impl DigitalOutput for GpioLed {
    fn write(&mut self, level: Level) {
        self.pin.write(match level {
            Level::High => gpio::Level::High,
            Level::Low => gpio::Level::Low,
        });
    }
}
