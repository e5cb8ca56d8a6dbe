//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the FSM, its context and the feedback controller.
//! All I/O flows through port traits injected at call sites, so the whole
//! loop runs against mock adapters in tests.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//! ActuatorPort ◀──│   FSM · Feedback        │
//!                 └────────────────────────┘
//! ```
//!
//! One [`step`](AppService::step) is one loop iteration:
//! measure → decide → feedback (blocking) or idle → loop pause.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::drivers::feedback::{FeedbackController, FeedbackOutcome};
use crate::fsm::context::{FsmContext, Reading};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::shutdown::ShutdownToken;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort};

pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    feedback: FeedbackController,
    loop_interval_ms: u32,
    iterations: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let feedback = FeedbackController::new(&config);
        let loop_interval_ms = config.loop_interval_ms;
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            feedback,
            loop_interval_ms,
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "AppService started in {:?} ({:?} feedback)",
            self.fsm.current_state(),
            self.feedback.mode()
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration and return the state it ends in.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn step(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        shutdown: &ShutdownToken,
        sink: &mut impl EventSink,
    ) -> StateId {
        if self.fsm.current_state().is_terminal() {
            return StateId::Shutdown;
        }

        if !shutdown.is_requested() {
            self.iterations += 1;
            self.sense_and_respond(hw, delay, shutdown, sink);
            if self.state().is_terminal() {
                return StateId::Shutdown;
            }
            if shutdown.pause(delay, self.loop_interval_ms).is_ok() {
                return self.fsm.current_state();
            }
        }

        self.enter_shutdown(sink);
        self.fsm.current_state()
    }

    /// Step until the FSM reaches `Shutdown`.
    pub fn run(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        shutdown: &ShutdownToken,
        sink: &mut impl EventSink,
    ) {
        while !self.step(hw, delay, shutdown, sink).is_terminal() {}
        info!(
            "AppService stopped after {} iteration(s), {} detection(s)",
            self.iterations, self.ctx.detections
        );
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Loop iterations that took a measurement.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Readings that triggered feedback.
    pub fn detections(&self) -> u64 {
        self.ctx.detections
    }

    // ── Internal ──────────────────────────────────────────────

    fn sense_and_respond(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        shutdown: &ShutdownToken,
        sink: &mut impl EventSink,
    ) {
        self.ctx.reading = match hw.measure() {
            Ok(distance) => {
                sink.emit(&AppEvent::Measured(distance));
                Reading::Distance(distance)
            }
            Err(e) => {
                warn!("Distance measurement failed: {e}");
                sink.emit(&AppEvent::SensorFault(e));
                Reading::NoEcho
            }
        };

        // A stop that landed while the echo was being timed wins over the reading.
        if shutdown.is_requested() {
            self.enter_shutdown(sink);
            return;
        }

        let grasp = self.ctx.grasp_distance();
        let prev = self.tick();
        let detected = self.state() == StateId::Feedback;
        let Some(distance) = grasp.filter(|_| detected) else {
            sink.emit(&AppEvent::NoGrasp);
            self.emit_transition(prev, sink);
            return;
        };
        sink.emit(&AppEvent::GraspDetected(distance));
        self.emit_transition(prev, sink);

        let outcome = self.feedback.activate(hw, delay, shutdown);
        sink.emit(&AppEvent::FeedbackFinished {
            mode: self.feedback.mode(),
            outcome,
        });

        self.ctx.feedback_pending = false;
        if outcome == FeedbackOutcome::Completed {
            let prev = self.tick();
            self.emit_transition(prev, sink);
        }
    }

    fn enter_shutdown(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::ShutdownRequested);
        self.ctx.shutdown_requested = true;
        let prev = self.tick();
        self.emit_transition(prev, sink);
    }

    /// Tick the FSM; returns the state it was in before.
    fn tick(&mut self) -> StateId {
        let prev = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        prev
    }

    fn emit_transition(&self, prev: StateId, sink: &mut impl EventSink) {
        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: now,
            });
        }
    }
}
