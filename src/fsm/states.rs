//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  IDLE ──[reading < threshold]──▶ FEEDBACK
//!    ▲                                │
//!    └─────────[sequence done]────────┘
//!
//!  Any state ──[shutdown requested]──▶ SHUTDOWN (terminal)
//! ```

use super::context::{FsmContext, Reading};
use super::{StateDescriptor, StateId};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Feedback
        StateDescriptor {
            name: "Feedback",
            on_enter: Some(feedback_enter),
            on_exit: Some(feedback_exit),
            on_update: feedback_update,
        },
        // Index 2: Shutdown
        StateDescriptor {
            name: "Shutdown",
            on_enter: Some(shutdown_enter),
            on_exit: None,
            on_update: shutdown_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: waiting for something inside the threshold
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.reading = Reading::None;
    debug!("IDLE: watching for a hand inside {:.1} cm", ctx.config.detect_threshold_cm);
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.shutdown_requested {
        return Some(StateId::Shutdown);
    }

    if ctx.grasp_distance().is_some() {
        return Some(StateId::Feedback);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FEEDBACK: the light/tone sequence is running
// ═══════════════════════════════════════════════════════════════════════════

fn feedback_enter(ctx: &mut FsmContext) {
    ctx.feedback_pending = true;
    ctx.detections += 1;
    if let Some(d) = ctx.grasp_distance() {
        info!("FEEDBACK: grasp at {d} (detection #{})", ctx.detections);
    }
}

fn feedback_exit(ctx: &mut FsmContext) {
    ctx.feedback_pending = false;
}

fn feedback_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.shutdown_requested {
        return Some(StateId::Shutdown);
    }

    if !ctx.feedback_pending {
        return Some(StateId::Idle);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SHUTDOWN: terminal, cleanup is the lifecycle's job
// ═══════════════════════════════════════════════════════════════════════════

fn shutdown_enter(ctx: &mut FsmContext) {
    info!(
        "SHUTDOWN: stopping after {} detection(s), {} tick(s)",
        ctx.detections, ctx.total_ticks
    );
}

fn shutdown_update(_ctx: &mut FsmContext) -> Option<StateId> {
    None
}
