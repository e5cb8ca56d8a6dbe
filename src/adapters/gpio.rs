//! `embedded-hal` digital pins over the raw GPIO helpers in
//! [`hw_init`](crate::drivers::hw_init).
//!
//! The ultrasonic driver is generic over `OutputPin` / `InputPin`; this is
//! the production implementation.  Pin direction is set once by
//! `init_peripherals`, so a line is just a pin number.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::drivers::hw_init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioLine {
    pin: i32,
}

impl GpioLine {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.pin, true);
        Ok(())
    }
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(hw_init::gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!hw_init::gpio_read(self.pin))
    }
}
