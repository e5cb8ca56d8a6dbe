//! Heartbeat pulse pattern for the feedback light.
//!
//! Generates the duty sequence the feedback controller walks through:
//! a brightening ramp from 0 to 100 % in fixed increments, then the exact
//! reverse.  The step delay is applied by the caller; this module only
//! owns the shape.
//!
//! | Phase       | Sequence (step = 5)      | Values |
//! |-------------|--------------------------|--------|
//! | Brightening | 0, 5, 10, … 95, 100      | 21     |
//! | Dimming     | 100, 95, … 5, 0          | 21     |

/// Peak duty of the pulse (percent).
pub const PULSE_MAX_DUTY: u8 = 100;

/// Which half of the pulse a duty value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampPhase {
    Brightening,
    Dimming,
}

/// Iterator over `(phase, duty)` for one full pulse.  No heap.
#[derive(Debug, Clone)]
pub struct PulsePattern {
    step: u8,
    phase: RampPhase,
    next: Option<u8>,
}

impl PulsePattern {
    /// `step` must divide 100; a step of 0 is treated as 1.
    pub fn new(step: u8) -> Self {
        Self {
            step: step.clamp(1, PULSE_MAX_DUTY),
            phase: RampPhase::Brightening,
            next: Some(0),
        }
    }

    /// Number of duty values in one phase.
    pub fn steps_per_phase(&self) -> usize {
        usize::from(PULSE_MAX_DUTY / self.step) + 1
    }
}

impl Iterator for PulsePattern {
    type Item = (RampPhase, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let duty = self.next?;
        let phase = self.phase;

        self.next = match phase {
            RampPhase::Brightening => match duty.checked_add(self.step) {
                Some(up) if up <= PULSE_MAX_DUTY => Some(up),
                _ => {
                    self.phase = RampPhase::Dimming;
                    Some(PULSE_MAX_DUTY)
                }
            },
            RampPhase::Dimming => duty.checked_sub(self.step),
        };

        Some((phase, duty))
    }
}
