//! Zest Report - step-level screenshot capture and result reporting for
//! browser test runners.
//!
//! This crate provides:
//! - A step interceptor that captures a screenshot after every user step
//! - An append-only collector for the runner's (test, outcome) pairs
//! - A pure pipeline normalizing results (tests → steps → attachments) and
//!   reinstating planned-but-unexecuted steps as placeholders
//! - Fault-isolated sinks: JSON report, console summary, disk screenshots,
//!   external test-management updater
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zest_report::{Config, MockPage, RecordingSink, StepContext, StepRunner};
//!
//! let config = Config::defaults();
//! let page = Arc::new(MockPage::new());
//! let sink = Arc::new(RecordingSink::new());
//! let steps = StepRunner::new(StepContext::new(page, sink), config.screenshots.clone());
//!
//! let result: Result<(), String> = steps.step("Open login page", || Ok(()));
//! assert!(result.is_ok());
//! ```

pub mod config;
pub mod report;
pub mod reporter;
pub mod runner;
pub mod sink;

// Re-export configuration
pub use config::{Config, ConfigOverrides, ExternalServiceSettings, ReporterSettings, ScreenshotSettings};

// Re-export runner integration types
pub use runner::{
    AttachmentBody, AttachmentSink, CaptureError, CompletedTest, MockPage, PageHandle,
    RawAttachment, RawError, RawStep, RecordingSink, ResultCollector, StepContext, StepRunner,
    TestCase, TestOutcome, capture_step_screenshot,
};

// Re-export the normalized schema and pipeline
pub use report::{
    Attachment, NoPlannedSteps, PlannedStepSource, SourceScanner, StepError, StepRecord,
    StepStatus, TestRecord, TestRun, build_test_run,
};

// Re-export sinks
pub use sink::{
    CurlApi, ExternalApi, SinkError, UpdateSummary, dispatch, load_json_report, print_test_run,
    render_test_run, save_json_report, save_screenshots_to_disk, update_execution_results,
};

// Re-export the reporter facade
pub use reporter::Reporter;
