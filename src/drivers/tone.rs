//! Passive buzzer driver.
//!
//! LEDC CH1 runs a fixed 659 Hz timer; the tone is a 50 % square wave
//! while on and a 0 % duty (silent, line held LOW) while off.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init.
//! On host/test: writes the simulated register.

use log::warn;

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneState {
    Silent,
    Sounding,
}

pub struct ToneDriver {
    state: ToneState,
}

impl Default for ToneDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneDriver {
    pub fn new() -> Self {
        Self {
            state: ToneState::Silent,
        }
    }

    pub fn start(&mut self) {
        self.set_duty_hw(pins::TONE_DUTY_PERCENT);
        self.state = ToneState::Sounding;
    }

    pub fn stop(&mut self) {
        self.set_duty_hw(0);
        self.state = ToneState::Silent;
    }

    fn set_duty_hw(&self, percent: u8) {
        if let Err(e) = hw_init::ledc_set(hw_init::LEDC_CH_TONE, hw_init::percent_to_ledc(percent)) {
            warn!("tone: {} (duty={}%)", e, percent);
        }
    }

    pub fn state(&self) -> ToneState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == ToneState::Sounding
    }
}
