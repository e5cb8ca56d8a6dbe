//! Detection feedback: light pulse and buzzer tone.
//!
//! [`FeedbackController::activate`] is blocking.  It returns only when the
//! configured sequence has played out, so no measurement happens while
//! feedback is running.  The one exception is a shutdown request, which is
//! checked before every ramp step and every pause slice; the controller
//! then puts both actuators at rest and returns
//! [`FeedbackOutcome::Interrupted`].
//!
//! ```text
//! PulseWithTone:  tone ▕‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾▏
//!                 light  ▁▂▃▄▅▆▇█ █▇▆▅▄▃▂▁   (20 ms per step)
//!
//! SustainedTone:  tone ▕‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾▏ (light untouched)
//! ```

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::ports::ActuatorPort;
use crate::config::{FeedbackMode, SystemConfig};
use crate::drivers::pulse::PulsePattern;
use crate::shutdown::ShutdownToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Completed,
    Interrupted,
}

pub struct FeedbackController {
    mode: FeedbackMode,
    ramp_step_percent: u8,
    ramp_step_delay_ms: u32,
    sustained_tone_ms: u32,
}

impl FeedbackController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            mode: config.feedback_mode,
            ramp_step_percent: config.ramp_step_percent,
            ramp_step_delay_ms: config.ramp_step_delay_ms,
            sustained_tone_ms: config.sustained_tone_ms,
        }
    }

    pub fn mode(&self) -> FeedbackMode {
        self.mode
    }

    /// Play the configured feedback sequence to completion.
    pub fn activate(
        &self,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        shutdown: &ShutdownToken,
    ) -> FeedbackOutcome {
        let outcome = match self.mode {
            FeedbackMode::PulseWithTone => self.pulse(hw, delay, shutdown),
            FeedbackMode::SustainedTone => self.sustain(hw, delay, shutdown),
        };

        if outcome == FeedbackOutcome::Interrupted {
            info!("feedback: interrupted, actuators to rest");
            hw.all_off();
        }
        outcome
    }

    fn pulse(
        &self,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        shutdown: &ShutdownToken,
    ) -> FeedbackOutcome {
        hw.tone_on();
        for (_phase, duty) in PulsePattern::new(self.ramp_step_percent) {
            if shutdown.is_requested() {
                return FeedbackOutcome::Interrupted;
            }
            hw.set_light_duty(duty);
            delay.delay_ms(self.ramp_step_delay_ms);
        }
        hw.tone_off();
        FeedbackOutcome::Completed
    }

    fn sustain(
        &self,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        shutdown: &ShutdownToken,
    ) -> FeedbackOutcome {
        hw.tone_on();
        if shutdown.pause(delay, self.sustained_tone_ms).is_err() {
            return FeedbackOutcome::Interrupted;
        }
        hw.tone_off();
        FeedbackOutcome::Completed
    }
}
