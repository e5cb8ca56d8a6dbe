//! Mock hardware adapter for integration tests.
//!
//! Records every port call (and every delay) in one shared, ordered log so
//! tests can assert on the full command history after the hardware has
//! been moved into a `HardwareContext`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use grasp_feedback::app::events::AppEvent;
use grasp_feedback::app::ports::{ActuatorPort, EventSink, HardwarePort, SensorPort};
use grasp_feedback::drivers::hw_init::HwInitError;
use grasp_feedback::error::{Result, SensorError};
use grasp_feedback::sensors::Distance;
use grasp_feedback::shutdown::ShutdownToken;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HwCall {
    Configure,
    Measure,
    SetLight(u8),
    ToneOn,
    ToneOff,
    /// A delay, in milliseconds.
    Sleep(u32),
    Release,
}

#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<HwCall>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn push(&self, call: HwCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: HwCall) -> usize {
        self.0.borrow().iter().filter(|c| **c == call).count()
    }

    pub fn light_duties(&self) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HwCall::SetLight(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    /// Light level and tone state implied by the log.
    pub fn final_outputs(&self) -> (u8, bool) {
        let mut duty = 0;
        let mut tone = false;
        for call in self.0.borrow().iter() {
            match call {
                HwCall::SetLight(d) => duty = *d,
                HwCall::ToneOn => tone = true,
                HwCall::ToneOff => tone = false,
                _ => {}
            }
        }
        (duty, tone)
    }
}

// ── Shutdown triggers ─────────────────────────────────────────

/// When the mock presses the stop button.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum Trip {
    /// Only when the scripted readings run out.
    ScriptExhausted,
    /// On the `nth` (0-based) write of this light duty.
    OnDuty { duty: u8, nth: usize },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub log: CallLog,
    readings: VecDeque<core::result::Result<Distance, SensorError>>,
    shutdown: ShutdownToken,
    trip: Trip,
    duty: u8,
    tone: bool,
    pub fail_configure: bool,
    pub panic_on_measure: bool,
}

#[allow(dead_code)]
impl MockHardware {
    /// Serves `readings` in order.  Once they run out every measurement is
    /// out of range and the stop button is pressed.
    pub fn new(
        readings: &[core::result::Result<Distance, SensorError>],
        shutdown: &ShutdownToken,
    ) -> Self {
        Self {
            log: CallLog::default(),
            readings: readings.iter().copied().collect(),
            shutdown: shutdown.clone(),
            trip: Trip::ScriptExhausted,
            duty: 0,
            tone: false,
            fail_configure: false,
            panic_on_measure: false,
        }
    }

    pub fn at_cm(cms: &[f32], shutdown: &ShutdownToken) -> Self {
        let readings: Vec<_> = cms.iter().map(|cm| Ok(Distance::from_cm(*cm))).collect();
        Self::new(&readings, shutdown)
    }

    pub fn with_trip(mut self, trip: Trip) -> Self {
        self.trip = trip;
        self
    }
}

impl SensorPort for MockHardware {
    fn measure(&mut self) -> core::result::Result<Distance, SensorError> {
        self.log.push(HwCall::Measure);
        assert!(!self.panic_on_measure, "sensor exploded");
        match self.readings.pop_front() {
            Some(reading) => reading,
            None => {
                self.shutdown.request();
                Ok(Distance::OUT_OF_RANGE)
            }
        }
    }
}

impl ActuatorPort for MockHardware {
    fn set_light_duty(&mut self, percent: u8) {
        self.log.push(HwCall::SetLight(percent));
        self.duty = percent;
        if let Trip::OnDuty { duty, nth } = &mut self.trip {
            if *duty == percent {
                if *nth == 0 {
                    self.shutdown.request();
                }
                *nth = nth.wrapping_sub(1);
            }
        }
    }

    fn light_duty(&self) -> u8 {
        self.duty
    }

    fn tone_on(&mut self) {
        self.log.push(HwCall::ToneOn);
        self.tone = true;
    }

    fn tone_off(&mut self) {
        self.log.push(HwCall::ToneOff);
        self.tone = false;
    }

    fn is_tone_on(&self) -> bool {
        self.tone
    }
}

impl HardwarePort for MockHardware {
    fn configure(&mut self) -> Result<()> {
        self.log.push(HwCall::Configure);
        if self.fail_configure {
            return Err(HwInitError::LedcInitFailed(-1).into());
        }
        Ok(())
    }

    fn release(&mut self) {
        self.log.push(HwCall::Release);
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Records delays instead of sleeping.  Optionally presses the stop button
/// once a total amount of time has been slept.
pub struct MockDelay {
    log: CallLog,
    shutdown: ShutdownToken,
    trip_after_ms: Option<u32>,
    slept_ms: u32,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn new(log: &CallLog, shutdown: &ShutdownToken) -> Self {
        Self {
            log: log.clone(),
            shutdown: shutdown.clone(),
            trip_after_ms: None,
            slept_ms: 0,
        }
    }

    pub fn trip_after_ms(mut self, ms: u32) -> Self {
        self.trip_after_ms = Some(ms);
        self
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        let ms = ns / 1_000_000;
        self.log.push(HwCall::Sleep(ms));
        self.slept_ms += ms;
        if self.trip_after_ms.is_some_and(|limit| self.slept_ms >= limit) {
            self.shutdown.request();
        }
    }
}

// ── LogSink ──────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
