//! Process lifecycle: acquire the hardware, run the loop, release.
//!
//! [`HardwareContext`] is the owned handle to the process-wide pin and PWM
//! setup.  Acquiring it configures the hardware; releasing it puts both
//! actuators at rest and resets the pins.  Release happens exactly once,
//! whether it is called explicitly, the caller returns early, or a panic
//! unwinds through `Drop`.

use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::Result;
use crate::shutdown::ShutdownToken;

use super::events::AppEvent;
use super::ports::{EventSink, HardwarePort};
use super::service::AppService;

pub struct HardwareContext<H: HardwarePort> {
    hw: H,
    released: bool,
}

impl<H: HardwarePort> HardwareContext<H> {
    /// Configure `hw` and take ownership of it.
    ///
    /// If configuration fails the partially configured pins are released
    /// before the error is returned.
    pub fn acquire(mut hw: H) -> Result<Self> {
        if let Err(e) = hw.configure() {
            warn!("Hardware configuration failed: {e}");
            hw.release();
            return Err(e);
        }
        info!("Hardware configured");
        Ok(Self {
            hw,
            released: false,
        })
    }

    /// Actuators to rest, then release every pin.  Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.hw.all_off();
        self.hw.release();
        info!("Hardware released");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<H: HardwarePort> Deref for HardwareContext<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.hw
    }
}

impl<H: HardwarePort> DerefMut for HardwareContext<H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

impl<H: HardwarePort> Drop for HardwareContext<H> {
    fn drop(&mut self) {
        self.release();
    }
}

/// The whole program: validate `config`, acquire `hw`, run the loop until
/// `shutdown` is requested, release.
pub fn run_until_shutdown<H: HardwarePort>(
    hw: H,
    config: SystemConfig,
    delay: &mut impl DelayNs,
    shutdown: &ShutdownToken,
    sink: &mut impl EventSink,
) -> Result<()> {
    config.validate()?;

    let mut hw = HardwareContext::acquire(hw)?;
    let mut app = AppService::new(config);
    app.start(sink);
    app.run(&mut *hw, delay, shutdown, sink);

    hw.release();
    sink.emit(&AppEvent::Stopped);
    Ok(())
}
