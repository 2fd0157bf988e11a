//! Append-only store for (test, outcome) pairs emitted during a run.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

use super::types::{TestCase, TestOutcome};

/// One completed test as handed over by the runner
#[derive(Debug, Clone)]
pub struct CompletedTest {
    /// The test case that finished
    pub test: TestCase,
    /// Its end-of-test result
    pub outcome: TestOutcome,
}

/// Collects raw results as the runner reports test completions.
///
/// Append-only and untransformed; one end-of-test callback at a time per
/// process (single-writer contract), hence the plain mutex.
#[derive(Debug)]
pub struct ResultCollector {
    entries: Mutex<Vec<CompletedTest>>,
    started_at: DateTime<Utc>,
}

impl ResultCollector {
    /// Create an empty collector, stamping the run start time
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            started_at: Utc::now(),
        }
    }

    /// Append a completed test in arrival order
    pub fn add(&self, test: TestCase, outcome: TestOutcome) {
        self.entries.lock().unwrap().push(CompletedTest { test, outcome });
    }

    /// Number of completed tests collected so far
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// True when no test has completed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take all collected entries, leaving the collector empty
    pub fn drain(&self) -> Vec<CompletedTest> {
        std::mem::take(&mut self.entries.lock().unwrap())
    }

    /// When this run started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self::new()
    }
}
