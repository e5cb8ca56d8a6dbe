//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  The distance and decision lines
//! are the operator-facing console output.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::feedback::FeedbackOutcome;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("Start: Remote hand-holding machine running...");
                debug!("START | initial_state={:?}", state);
            }
            AppEvent::Measured(distance) => {
                info!("Current distance: {:.2} cm", distance.cm());
            }
            AppEvent::SensorFault(e) => {
                warn!("SENSOR | {} (treated as no grasp)", e);
            }
            AppEvent::GraspDetected(_) => {
                info!("Grasp detected! Sending feedback signal.");
            }
            AppEvent::NoGrasp => {
                info!("No grasp detected.");
            }
            AppEvent::FeedbackFinished { mode, outcome } => match outcome {
                FeedbackOutcome::Completed => debug!("FEEDBACK | {:?} done", mode),
                FeedbackOutcome::Interrupted => info!("FEEDBACK | {:?} interrupted", mode),
            },
            AppEvent::StateChanged { from, to } => {
                debug!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ShutdownRequested => {
                info!("Program terminated. Cleaning up GPIO...");
            }
            AppEvent::Stopped => {
                info!("STOP | pins released");
            }
        }
    }
}
