//! Runner-facing reporter facade.
//!
//! The runner calls `on_test_end` as tests complete and `on_run_end` once
//! after the run. Everything between the raw collected pairs and the sinks is
//! the pure pipeline in `report`.

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::report::planned::{PlannedStepSource, SourceScanner};
use crate::report::types::TestRun;
use crate::runner::collector::ResultCollector;
use crate::runner::types::{TestCase, TestOutcome};
use crate::sink;

/// Collects results during a run and produces/dispatches the final document
pub struct Reporter {
    collector: ResultCollector,
    config: Config,
    planned: Box<dyn PlannedStepSource>,
}

impl Reporter {
    /// Create a reporter with the default source scanner
    pub fn new(config: Config) -> Self {
        Self::with_planned_source(config, Box::new(SourceScanner::new()))
    }

    /// Create a reporter with a custom planned-step source
    pub fn with_planned_source(config: Config, planned: Box<dyn PlannedStepSource>) -> Self {
        Self {
            collector: ResultCollector::new(),
            config,
            planned,
        }
    }

    /// Record one completed test, in completion order
    pub fn on_test_end(&self, test: TestCase, outcome: TestOutcome) {
        self.collector.add(test, outcome);
    }

    /// Build the final run document and fan it out to the sinks.
    ///
    /// Returns the document so embedders can inspect it; sinks have already
    /// consumed it by then.
    pub fn on_run_end(&self) -> TestRun {
        let entries = self.collector.drain();
        let run = crate::report::build_test_run(&entries, self.planned.as_ref());

        let elapsed = Utc::now() - self.collector.started_at();
        info!(
            tests = run.tests.len(),
            elapsed_ms = elapsed.num_milliseconds(),
            "run finished, dispatching sinks"
        );

        sink::dispatch(&run, &self.config);
        run
    }

    /// The configuration this reporter runs with
    pub fn config(&self) -> &Config {
        &self.config
    }
}
