//! Upload progress estimation.
//!
//! The storage backend reports only eventual success or failure, so in-flight progress is an
//! estimate for display purposes. The reducer, not the estimator, enforces the ceiling and
//! monotonicity; an estimator only proposes step sizes.

use std::cell::RefCell;

use rand::{rngs::StdRng, Rng, SeedableRng};
use workspace_host::unix_time_ms_now;

/// Proposes progress steps for in-flight uploads.
pub trait ProgressEstimator {
    /// Whether ticks should run at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Percentage points to add on the next tick, given the current estimate.
    fn next_increment(&self, current_percent: u8) -> u8;
}

/// Pseudo-random steps between 1 and `max_step` percentage points.
#[derive(Debug)]
pub struct SimulatedProgress {
    rng: RefCell<StdRng>,
    max_step: u8,
}

impl SimulatedProgress {
    /// Default largest single step.
    pub const DEFAULT_MAX_STEP: u8 = 15;

    /// Deterministic sequence for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            max_step: Self::DEFAULT_MAX_STEP,
        }
    }

    /// Overrides the largest single step. Values below 1 are raised to 1.
    pub fn with_max_step(mut self, max_step: u8) -> Self {
        self.max_step = max_step.max(1);
        self
    }
}

impl Default for SimulatedProgress {
    fn default() -> Self {
        Self::seeded(unix_time_ms_now())
    }
}

impl ProgressEstimator for SimulatedProgress {
    fn next_increment(&self, _current_percent: u8) -> u8 {
        self.rng.borrow_mut().gen_range(1..=self.max_step)
    }
}

/// Disables simulated ticks; progress jumps straight from 0 to 100 on success.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgressEstimate;

impl ProgressEstimator for NoProgressEstimate {
    fn is_enabled(&self) -> bool {
        false
    }

    fn next_increment(&self, _current_percent: u8) -> u8 {
        0
    }
}

/// Fixed step, for tests that need exact progress values.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepProgress(pub u8);

impl ProgressEstimator for FixedStepProgress {
    fn next_increment(&self, _current_percent: u8) -> u8 {
        self.0
    }
}
