use std::time::{Duration, Instant};

use crate::error::SolveError;

/// A cooperative wall-clock budget, polled by strategies at every search node.
///
/// Reading the clock at every node is wasteful for cheap nodes, so only steps where
/// `steps & clock_check_mask == 0` look at the time. Step 0 always does, which makes a zero budget fail on the very first check.
#[derive(Debug, Clone)]
pub struct Deadline {
    clock_check_mask: u64,
    steps: u64,
    time_limit: Option<Duration>,
    start_time: Instant,
}

impl Deadline {
    /// Check roughly every 1024 steps.
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FF;

    /// Start the clock now, with the default check interval.
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    /// Never expires.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Start the clock now, reading it only on steps where `steps & clock_check_mask == 0`.
    pub fn with_clock_check_mask(time_limit: Option<Duration>, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: Instant::now(),
        }
    }

    /// Time since the deadline was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// The budget, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Count one step and fail with [`SolveError::TimedOut`] if the budget is spent.
    #[inline]
    pub fn check(&mut self) -> Result<(), SolveError> {
        let step = self.steps;
        self.steps = step.wrapping_add(1);
        if step & self.clock_check_mask != 0 {
            return Ok(());
        }

        match self.time_limit {
            Some(limit) if self.elapsed() >= limit => Err(SolveError::TimedOut { elapsed: self.elapsed() }),
            _ => Ok(()),
        }
    }
}
