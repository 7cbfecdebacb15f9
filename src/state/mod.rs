// State module - run counters and failure deduplication

pub mod result;

pub use result::{ExampleId, FailedExample};

use serde::Serialize;
use std::collections::HashSet;

/// Aggregate status of a run, used to pick the render color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Pending,
    Failure,
}

/// Outcome counters for the current run
#[derive(Debug, Clone, Default)]
pub struct RunState {
    passed: u64,
    pending: u64,
    failed: u64,
    total_expected: u64,
    seen_failures: HashSet<String>,
}

impl RunState {
    /// Create an empty run state
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear counters and the dedup set for a new run of `total` examples
    pub fn reset(&mut self, total: u64) {
        self.passed = 0;
        self.pending = 0;
        self.failed = 0;
        self.total_expected = total;
        self.seen_failures.clear();
    }

    pub fn record_passed(&mut self) {
        self.passed += 1;
    }

    pub fn record_pending(&mut self) {
        self.pending += 1;
    }

    /// Count a failure and report whether its identity is new for this run.
    ///
    /// The counter always moves; only the returned flag depends on the dedup set.
    pub fn record_failed(&mut self, example: &ExampleId) -> bool {
        self.failed += 1;
        self.seen_failures.insert(example.dedup_key())
    }

    pub fn passed(&self) -> u64 {
        self.passed
    }

    pub fn pending(&self) -> u64 {
        self.pending
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn total_expected(&self) -> u64 {
        self.total_expected
    }

    /// Number of outcome events processed since the last reset
    pub fn processed(&self) -> u64 {
        self.passed + self.pending + self.failed
    }

    /// Failure wins over pending, pending over success
    pub fn status(&self) -> RunStatus {
        if self.failed > 0 {
            RunStatus::Failure
        } else if self.pending > 0 {
            RunStatus::Pending
        } else {
            RunStatus::Success
        }
    }
}
