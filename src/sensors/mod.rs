//! Sensor subsystem: the ultrasonic driver and the [`Distance`] it produces.

pub mod ultrasonic;

use core::fmt;

/// Speed of sound at room temperature (cm/s).
pub const SPEED_OF_SOUND_CM_PER_S: f32 = 34_300.0;

/// A distance estimate in centimetres.
///
/// [`Distance::OUT_OF_RANGE`] (999 cm) is reserved for "the echo did not
/// finish within the timeout"; it is far outside the working envelope of
/// the sensor so it always compares as "nothing detected".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(f32);

impl Distance {
    /// Sentinel for a reading whose echo did not fall in time.
    pub const OUT_OF_RANGE: Self = Self(999.0);

    pub const fn from_cm(cm: f32) -> Self {
        Self(cm)
    }

    /// Convert a round-trip echo duration into a one-way distance.
    pub fn from_echo_us(echo_us: u64) -> Self {
        let secs = echo_us as f32 / 1_000_000.0;
        Self(secs * SPEED_OF_SOUND_CM_PER_S / 2.0)
    }

    pub const fn cm(self) -> f32 {
        self.0
    }

    pub fn is_out_of_range(self) -> bool {
        self == Self::OUT_OF_RANGE
    }

    /// `true` when the reading is strictly closer than `threshold_cm`.
    pub fn is_within(self, threshold_cm: f32) -> bool {
        self.0 < threshold_cm
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} cm", self.0)
    }
}
