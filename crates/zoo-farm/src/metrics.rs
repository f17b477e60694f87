/*
[INPUT]:  Per-account outcomes of one cycle
[OUTPUT]: Cycle counters and duration for end-of-cycle logging
[POS]:    Shared runtime metrics between scheduler and entry point
[UPDATE]: When adding/removing cycle-level signals
*/

use std::time::{Duration, Instant};

use tracing::info;

use crate::scheduler::{OutcomeStatus, PipelineOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleMetricsSnapshot {
    pub cycle: u64,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub not_started: usize,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct CycleMetrics {
    cycle: u64,
    started_at: Instant,
    succeeded: usize,
    failed: usize,
    timed_out: usize,
    not_started: usize,
}

impl CycleMetrics {
    pub fn start(cycle: u64) -> Self {
        Self {
            cycle,
            started_at: Instant::now(),
            succeeded: 0,
            failed: 0,
            timed_out: 0,
            not_started: 0,
        }
    }

    pub fn record(&mut self, outcome: &PipelineOutcome) {
        match outcome.status {
            OutcomeStatus::Succeeded(_) => self.succeeded += 1,
            OutcomeStatus::Failed(_) => self.failed += 1,
            OutcomeStatus::TimedOut => self.timed_out += 1,
        }
    }

    /// Accounts left undispatched because of shutdown
    pub fn record_not_started(&mut self, count: usize) {
        self.not_started += count;
    }

    pub fn snapshot(&self) -> CycleMetricsSnapshot {
        CycleMetricsSnapshot {
            cycle: self.cycle,
            succeeded: self.succeeded,
            failed: self.failed,
            timed_out: self.timed_out,
            not_started: self.not_started,
            duration: self.started_at.elapsed(),
        }
    }

    pub fn log(&self) {
        let snapshot = self.snapshot();
        info!(
            cycle = snapshot.cycle,
            succeeded = snapshot.succeeded,
            failed = snapshot.failed,
            timed_out = snapshot.timed_out,
            not_started = snapshot.not_started,
            duration_secs = snapshot.duration.as_secs(),
            "cycle complete"
        );
    }
}
