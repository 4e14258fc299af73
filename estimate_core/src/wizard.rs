//! # Wizard Navigation
//!
//! Bounded step cursors for the estimate wizard and the contract-signing
//! sub-flow. A cursor lives in `[1, last]`, moves by one in either
//! direction without wrapping, and can jump to any in-range step. There is
//! no terminal state.

use serde::{Deserialize, Serialize};

/// Steps in the estimate wizard
pub const STEP_COUNT: u8 = 6;

/// Sections in the contract-signing flow
pub const CONTRACT_SECTION_COUNT: u8 = 7;

/// Position within a fixed-length sequence of steps (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepCursor {
    current: u8,
    last: u8,
}

impl StepCursor {
    /// New cursor on step 1. `last` is raised to 1 if given as 0.
    pub fn new(last: u8) -> Self {
        StepCursor {
            current: 1,
            last: last.max(1),
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn last(&self) -> u8 {
        self.last
    }

    /// Move forward one step. Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        if self.current < self.last {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back one step. Returns `false` at step 1.
    pub fn retreat(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `step` if it is in range. Returns `false` (and stays put)
    /// otherwise.
    pub fn go_to(&mut self, step: u8) -> bool {
        if (1..=self.last).contains(&step) {
            self.current = step;
            true
        } else {
            false
        }
    }
}

/// The two cursors the estimator UI navigates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardPosition {
    pub step: StepCursor,
    pub contract_section: StepCursor,
}

impl Default for WizardPosition {
    fn default() -> Self {
        WizardPosition {
            step: StepCursor::new(STEP_COUNT),
            contract_section: StepCursor::new(CONTRACT_SECTION_COUNT),
        }
    }
}
