//! Feedback light driver.
//!
//! One LEDC PWM channel (CH0, 100 Hz) dims a single LED.  Intensity is a
//! duty percentage; 0 is dark.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init.
//! On host/test: writes the simulated register.

use log::warn;

use crate::drivers::hw_init;

pub struct LightDriver {
    channel: u32,
    /// Last duty the LEDC accepted.
    duty: u8,
}

impl Default for LightDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LightDriver {
    pub fn new() -> Self {
        Self {
            channel: hw_init::LEDC_CH_LIGHT,
            duty: 0,
        }
    }

    /// Set intensity (0–100 %, clamped).
    pub fn set_duty(&mut self, percent: u8) {
        let percent = percent.min(100);
        match hw_init::ledc_set(self.channel, hw_init::percent_to_ledc(percent)) {
            Ok(()) => self.duty = percent,
            Err(e) => warn!("light: {} (duty={}%)", e, percent),
        }
    }

    pub fn off(&mut self) {
        self.set_duty(0);
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }
}
