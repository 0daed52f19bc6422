//! Stopping Criterion: bounds the ALNS loop by iteration count,
//! no-improvement streak, and wall-clock deadline. Must be queried
//! exactly once per iteration, after acceptance.

use crate::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct StopParams {
    pub max_iterations: u64,
    pub max_no_improve: u64,
    pub wall_clock_deadline: Duration,
}

pub struct StoppingCriterion {
    params: StopParams,
    start: Instant,
    iterations: u64,
    iterations_since_best: u64,
}

impl StoppingCriterion {
    pub fn new(params: StopParams) -> Self {
        Self { params, start: Instant::now(), iterations: 0, iterations_since_best: 0 }
    }

    /// Records one completed iteration. `improved` reflects whether
    /// acceptance promoted the candidate to best.
    pub fn record_iteration(&mut self, improved: bool) {
        self.iterations += 1;
        if improved {
            self.iterations_since_best = 0;
        } else {
            self.iterations_since_best += 1;
        }
    }

    pub fn should_stop(&self) -> bool {
        self.iterations >= self.params.max_iterations
            || self.iterations_since_best >= self.params.max_no_improve
            || self.start.elapsed() >= self.params.wall_clock_deadline
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
