//! HC-SR04 ultrasonic time-of-flight sensor driver.
//!
//! A 10 µs HIGH pulse on the trigger line makes the module emit a 40 kHz
//! burst; the echo line then goes HIGH for the round-trip time of the
//! burst.  Distance is half the round trip at the speed of sound.
//!
//! ```text
//! TRIG ─┐‾‾┌───────────────────────────────
//! ECHO ──────────┐‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾┌─────────
//!                ◀─── round trip ──▶
//! ```
//!
//! Both waits on the echo line are bounded.  If the echo rises but does
//! not fall within the timeout, the reading is [`Distance::OUT_OF_RANGE`];
//! if it never rises, the measurement fails with
//! [`SensorError::EchoRiseTimeout`].
//!
//! The driver is generic over `embedded-hal` pins and delay plus the
//! [`Clock`] port, so the same code runs on the ESP32 GPIO adapters and
//! against test fakes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::app::ports::Clock;
use crate::config::SystemConfig;
use crate::error::SensorError;
use crate::sensors::Distance;

/// Timing parameters for one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoTiming {
    /// Trigger pulse width (µs).
    pub trigger_pulse_us: u32,
    /// Bound on each echo wait (µs).
    pub echo_timeout_us: u64,
}

impl EchoTiming {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            trigger_pulse_us: config.trigger_pulse_us,
            echo_timeout_us: config.echo_timeout_us,
        }
    }
}

/// Result of waiting for the echo line to reach a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// The line reached the level; timestamp of the first sample that saw it.
    Reached { at_us: u64 },
    /// The deadline passed first.
    Expired { elapsed_us: u64 },
}

pub struct UltrasonicSensor<T, E, C, D> {
    trigger: T,
    echo: E,
    clock: C,
    delay: D,
    timing: EchoTiming,
}

impl<T, E, C, D> UltrasonicSensor<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    D: DelayNs,
{
    pub fn new(trigger: T, echo: E, clock: C, delay: D, timing: EchoTiming) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
            timing,
        }
    }

    /// Trigger one ranging cycle and time the echo.
    pub fn measure(&mut self) -> Result<Distance, SensorError> {
        self.pulse_trigger()?;

        let wait_began = self.clock.now_us();
        let rise = self.poll_level(PinState::High, wait_began, self.timing.echo_timeout_us)?;
        let start_us = match rise {
            Poll::Reached { at_us } => at_us,
            Poll::Expired { .. } => return Err(SensorError::EchoRiseTimeout),
        };

        match self.poll_level(PinState::Low, start_us, self.timing.echo_timeout_us)? {
            Poll::Reached { at_us } => Ok(Distance::from_echo_us(at_us - start_us)),
            Poll::Expired { .. } => Ok(Distance::OUT_OF_RANGE),
        }
    }

    /// Poll the echo line until it reads `level`, or until more than
    /// `timeout_us` has passed since `since_us`.
    ///
    /// Each iteration reads the pin first and then samples the clock, so a
    /// `Reached` timestamp is never earlier than the sample that saw the
    /// level.
    pub fn poll_level(
        &mut self,
        level: PinState,
        since_us: u64,
        timeout_us: u64,
    ) -> Result<Poll, SensorError> {
        loop {
            let high = self.echo.is_high().map_err(|_| SensorError::GpioReadFailed)?;
            let now = self.clock.now_us();
            if high == (level == PinState::High) {
                return Ok(Poll::Reached { at_us: now });
            }
            let elapsed_us = now.saturating_sub(since_us);
            if elapsed_us > timeout_us {
                return Ok(Poll::Expired { elapsed_us });
            }
        }
    }

    fn pulse_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger
            .set_high()
            .map_err(|_| SensorError::TriggerWriteFailed)?;
        self.delay.delay_us(self.timing.trigger_pulse_us);
        self.trigger
            .set_low()
            .map_err(|_| SensorError::TriggerWriteFailed)
    }
}
