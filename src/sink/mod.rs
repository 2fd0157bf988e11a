//! Sinks: independent consumers of the final run document.
//!
//! Fan-out runs sequentially in a fixed order (JSON → console → disk →
//! external), each sink gated by its own configuration flag and individually
//! fault-isolated: a failing sink is logged and the next one still runs.
//! Sinks only read the document; none of them mutates it.

pub mod console;
pub mod disk;
pub mod external;
pub mod json;

pub use console::{print_test_run, render_test_run};
pub use disk::save_screenshots_to_disk;
pub use external::{CurlApi, ExternalApi, ExternalError, UpdateSummary, update_execution_results};
pub use json::{load_json_report, save_json_report};

use std::path::{Path, PathBuf};

use tracing::error;

use crate::config::{self, Config, REPORT_FILE_NAME};
use crate::report::types::TestRun;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Error types for sink operations
#[derive(Debug)]
pub enum SinkError {
    /// I/O error
    Io(std::io::Error),

    /// Serialization error
    Serialization(serde_json::Error),

    /// External service error
    External(ExternalError),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Io(err) => write!(f, "I/O error: {}", err),
            SinkError::Serialization(err) => write!(f, "Serialization error: {}", err),
            SinkError::External(err) => write!(f, "External service error: {}", err),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io(err) => Some(err),
            SinkError::Serialization(err) => Some(err),
            SinkError::External(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err)
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Serialization(err)
    }
}

impl From<ExternalError> for SinkError {
    fn from(err: ExternalError) -> Self {
        SinkError::External(err)
    }
}

/// Fan the final document out to every enabled sink.
///
/// Never fails: each sink's errors are logged and the remaining sinks still
/// run, so this layer cannot change the runner's verdict.
pub fn dispatch(run: &TestRun, config: &Config) {
    let output_dir = PathBuf::from(&config.reporter.output_dir);

    if config.reporter.save_json_report {
        if let Err(err) = save_json_report(run, &output_dir, config.screenshots.include_in_report) {
            error!(error = %err, "failed to save JSON report");
        }
    }

    if config.reporter.print_to_console {
        print_test_run(run);
    }

    if config.screenshots.save_to_disk || config::screenshots_forced_to_disk() {
        if let Err(err) = save_screenshots_to_disk(run, &output_dir) {
            error!(error = %err, "failed to save screenshots to disk");
        }
    }

    if config.external.enabled && config.external.update_results {
        let api = CurlApi::new(&config.external);
        if let Err(err) = update_execution_results(&api, &report_path(&output_dir), &config.external) {
            error!(error = %err, "failed to update external service");
        }
    }
}

/// Path of the persisted report for a given output directory
pub fn report_path(output_dir: &Path) -> PathBuf {
    output_dir.join(REPORT_FILE_NAME)
}
