//! Operator shutdown request.
//!
//! The control loop never blocks on anything that cannot be interrupted:
//! every delay longer than a trigger pulse is sliced, and the token is
//! checked between slices and at each loop iteration boundary.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Stop button ISR  │────▶│              │     │  Main loop   │
//! │ Host / tests     │────▶│ ShutdownToken│────▶│  Feedback    │
//! │                  │     │ (AtomicBool) │     │  Pauses      │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The flag is an `AtomicBool`, so setting it is lock-free and safe from
//! interrupt context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

/// Granularity of interruptible pauses (milliseconds).
pub const PAUSE_SLICE_MS: u32 = 10;

/// Returned when a pause was cut short by a shutdown request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownRequested;

/// Cloneable cancellation token shared between the loop and whoever may
/// stop it.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.  Idempotent.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Raw pointer to the flag, handed to the stop-button ISR as its
    /// argument.  The returned pointer keeps the allocation alive for the
    /// rest of the process (the ISR may fire at any time).
    pub fn into_isr_arg(self) -> *const AtomicBool {
        Arc::into_raw(self.flag)
    }

    /// Sleep for `total_ms`, checking the token every [`PAUSE_SLICE_MS`].
    pub fn pause(
        &self,
        delay: &mut impl DelayNs,
        total_ms: u32,
    ) -> Result<(), ShutdownRequested> {
        let mut remaining = total_ms;
        while remaining > 0 {
            if self.is_requested() {
                return Err(ShutdownRequested);
            }
            let slice = remaining.min(PAUSE_SLICE_MS);
            delay.delay_ms(slice);
            remaining -= slice;
        }
        Ok(())
    }
}

/// Set the flag behind a pointer obtained from
/// [`ShutdownToken::into_isr_arg`].
///
/// # Safety
///
/// `arg` must come from `into_isr_arg` (the allocation is never freed).
pub unsafe fn request_from_isr(arg: *const AtomicBool) {
    // SAFETY: caller contract; the Arc behind `arg` was leaked on purpose.
    let flag = unsafe { &*arg };
    flag.store(true, Ordering::Release);
}
