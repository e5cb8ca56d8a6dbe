//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the latest reading, the feedback handshake with the service
//! layer, tick counters and the configuration.

use crate::config::SystemConfig;
use crate::sensors::Distance;

/// Outcome of the most recent measurement cycle, as the FSM sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Nothing measured since the last decision.
    None,
    /// A distance, possibly [`Distance::OUT_OF_RANGE`].
    Distance(Distance),
    /// The echo never rose.
    NoEcho,
}

pub struct FsmContext {
    /// Ticks since the machine started.
    pub total_ticks: u64,

    // -- Inputs (written by the service before each tick) --
    pub reading: Reading,
    pub shutdown_requested: bool,

    /// Set on entering `Feedback`; the service clears it once the
    /// feedback sequence has returned.
    pub feedback_pending: bool,

    /// Number of qualifying readings since start.
    pub detections: u64,

    pub config: SystemConfig,
}

impl FsmContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            total_ticks: 0,
            reading: Reading::None,
            shutdown_requested: false,
            feedback_pending: false,
            detections: 0,
            config,
        }
    }

    /// The latest reading if it is a distance strictly inside the
    /// detection threshold.
    pub fn grasp_distance(&self) -> Option<Distance> {
        match self.reading {
            Reading::Distance(d) if d.is_within(self.config.detect_threshold_cm) => Some(d),
            _ => None,
        }
    }
}
