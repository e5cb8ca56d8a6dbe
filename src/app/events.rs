//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial console in production, a
//! recording vector in tests).

use crate::config::FeedbackMode;
use crate::drivers::feedback::FeedbackOutcome;
use crate::error::SensorError;
use crate::fsm::StateId;
use crate::sensors::Distance;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started (carries initial state).
    Started(StateId),

    /// A distance was measured this iteration.
    Measured(Distance),

    /// The sensor produced no usable reading this iteration.
    SensorFault(SensorError),

    /// The reading is inside the detection threshold; feedback follows.
    GraspDetected(Distance),

    /// Nothing inside the threshold this iteration.
    NoGrasp,

    /// The feedback sequence returned.
    FeedbackFinished {
        mode: FeedbackMode,
        outcome: FeedbackOutcome,
    },

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A shutdown request was observed; cleanup follows.
    ShutdownRequested,

    /// Hardware released; the loop is gone.
    Stopped,
}
