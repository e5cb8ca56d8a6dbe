//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor, actuators, clock, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::{Result, SensorError};
use crate::sensors::Distance;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per loop iteration.
pub trait SensorPort {
    /// Take one distance measurement.
    ///
    /// `Ok(Distance::OUT_OF_RANGE)` when the echo did not fall in time;
    /// `Err` when no usable echo was seen at all.
    fn measure(&mut self) -> core::result::Result<Distance, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the feedback controller drives the light and tone
/// through this.
pub trait ActuatorPort {
    /// Set the light intensity (0–100 %).
    fn set_light_duty(&mut self, percent: u8);

    /// Last light intensity written.
    fn light_duty(&self) -> u8;

    /// Start the fixed-frequency tone.
    fn tone_on(&mut self);

    /// Stop the tone.
    fn tone_off(&mut self);

    /// Whether the tone is currently sounding.
    fn is_tone_on(&self) -> bool;

    /// Light to 0 and tone off (rest state).
    fn all_off(&mut self) {
        self.set_light_duty(0);
        self.tone_off();
    }
}

// ───────────────────────────────────────────────────────────────
// Hardware lifecycle port
// ───────────────────────────────────────────────────────────────

/// The full hardware surface: measurement, actuation, and the one-shot
/// configure / release of the process-wide pin setup.
///
/// Owned by a [`HardwareContext`](super::lifecycle::HardwareContext), which
/// guarantees `release` runs exactly once.
pub trait HardwarePort: SensorPort + ActuatorPort {
    /// Configure every pin and PWM channel.  Called once at startup.
    fn configure(&mut self) -> Result<()>;

    /// Reset every configured pin.  Called once at shutdown.
    fn release(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock used to time the echo pulse.
pub trait Clock {
    fn now_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
