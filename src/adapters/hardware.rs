//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the ultrasonic sensor and both actuator drivers, exposing them
//! through [`SensorPort`], [`ActuatorPort`] and [`HardwarePort`].  This is
//! the only module in the system that touches actual hardware.  On
//! non-espidf targets the underlying drivers use the cfg-gated simulation
//! backend in `hw_init`.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::adapters::gpio::GpioLine;
use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{ActuatorPort, HardwarePort, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::drivers::light::LightDriver;
use crate::drivers::tone::ToneDriver;
use crate::error::{Result, SensorError};
use crate::pins;
use crate::sensors::Distance;
use crate::sensors::ultrasonic::{EchoTiming, UltrasonicSensor};
use crate::shutdown::ShutdownToken;

type Sensor<D> = UltrasonicSensor<GpioLine, GpioLine, Esp32TimeAdapter, D>;

/// Concrete adapter that combines all hardware behind port traits.
///
/// `D` is the delay used for the trigger pulse.
pub struct HardwareAdapter<D: DelayNs> {
    sensor: Sensor<D>,
    light: LightDriver,
    tone: ToneDriver,
    shutdown: ShutdownToken,
}

impl<D: DelayNs> HardwareAdapter<D> {
    /// `shutdown` is the token the stop button sets once the ISR is
    /// installed by [`HardwarePort::configure`].
    pub fn new(config: &SystemConfig, delay: D, shutdown: ShutdownToken) -> Self {
        let sensor = UltrasonicSensor::new(
            GpioLine::new(pins::TRIGGER_GPIO),
            GpioLine::new(pins::ECHO_GPIO),
            Esp32TimeAdapter::new(),
            delay,
            EchoTiming::from_config(config),
        );
        Self {
            sensor,
            light: LightDriver::new(),
            tone: ToneDriver::new(),
            shutdown,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn measure(&mut self) -> core::result::Result<Distance, SensorError> {
        self.sensor.measure()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D: DelayNs> ActuatorPort for HardwareAdapter<D> {
    fn set_light_duty(&mut self, percent: u8) {
        self.light.set_duty(percent);
    }

    fn light_duty(&self) -> u8 {
        self.light.duty()
    }

    fn tone_on(&mut self) {
        self.tone.start();
    }

    fn tone_off(&mut self) {
        self.tone.stop();
    }

    fn is_tone_on(&self) -> bool {
        self.tone.is_on()
    }

    fn all_off(&mut self) {
        self.light.off();
        self.tone.stop();
    }
}

// ── HardwarePort implementation ───────────────────────────────

impl<D: DelayNs> HardwarePort for HardwareAdapter<D> {
    fn configure(&mut self) -> Result<()> {
        hw_init::init_peripherals()?;
        hw_init::install_stop_isr(&self.shutdown)?;
        info!(
            "Pins: trigger={} echo={} light={} tone={} stop={}",
            pins::TRIGGER_GPIO,
            pins::ECHO_GPIO,
            pins::LIGHT_PWM_GPIO,
            pins::TONE_PWM_GPIO,
            pins::STOP_BUTTON_GPIO
        );
        Ok(())
    }

    fn release(&mut self) {
        hw_init::release_peripherals();
    }
}
