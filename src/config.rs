//! System configuration parameters
//!
//! All tunable parameters for the grasp feedback loop.  There is no runtime
//! configuration source: the firmware runs with [`SystemConfig::default()`],
//! and tests construct variants directly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sensors::Distance;

/// Feedback rendering strategy for a detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackMode {
    /// Light brightens then dims in discrete steps while the tone sounds.
    PulseWithTone,
    /// Tone held for a fixed duration; the light is not driven.
    SustainedTone,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Detection ---
    /// A reading strictly below this distance (cm) counts as a grasp.
    pub detect_threshold_cm: f32,

    // --- Sensor timing ---
    /// Trigger pulse width (microseconds).
    pub trigger_pulse_us: u32,
    /// Maximum wait for the echo to rise, and for it to fall after rising
    /// (microseconds).
    pub echo_timeout_us: u64,

    // --- Feedback ---
    pub feedback_mode: FeedbackMode,
    /// Duty increment per ramp step (percent).  Must divide 100 evenly.
    pub ramp_step_percent: u8,
    /// Delay between ramp steps (milliseconds).
    pub ramp_step_delay_ms: u32,
    /// How long the tone is held in sustained mode (milliseconds).
    pub sustained_tone_ms: u32,

    // --- Timing ---
    /// Delay between loop iterations (milliseconds).
    pub loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Detection
            detect_threshold_cm: 10.0,

            // Sensor timing
            trigger_pulse_us: 10,
            echo_timeout_us: 40_000, // ~6.8 m round trip

            // Feedback
            feedback_mode: FeedbackMode::PulseWithTone,
            ramp_step_percent: 5,
            ramp_step_delay_ms: 20,
            sustained_tone_ms: 1_000,

            // Timing
            loop_interval_ms: 500, // 2 Hz
        }
    }
}

impl SystemConfig {
    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.detect_threshold_cm.is_nan() || self.detect_threshold_cm <= 0.0 {
            return Err(Error::Config("detect_threshold_cm must be positive"));
        }
        if self.detect_threshold_cm >= Distance::OUT_OF_RANGE.cm() {
            return Err(Error::Config("detect_threshold_cm must be below the sentinel"));
        }
        if self.trigger_pulse_us == 0 {
            return Err(Error::Config("trigger_pulse_us must be non-zero"));
        }
        if self.echo_timeout_us == 0 {
            return Err(Error::Config("echo_timeout_us must be non-zero"));
        }
        if self.ramp_step_percent == 0 || self.ramp_step_percent > 100 {
            return Err(Error::Config("ramp_step_percent must be in 1..=100"));
        }
        if 100 % self.ramp_step_percent != 0 {
            return Err(Error::Config("ramp_step_percent must divide 100"));
        }
        if self.loop_interval_ms == 0 {
            return Err(Error::Config("loop_interval_ms must be non-zero"));
        }
        Ok(())
    }
}
