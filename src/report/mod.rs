//! The result pipeline: transform → reconcile → normalize names.
//!
//! A pure chain of immutable documents. The runner's collected pairs go in,
//! one final `TestRun` comes out; every stage produces a new document and the
//! result is fanned out to the sinks by the caller.

pub mod naming;
pub mod planned;
pub mod reconcile;
pub mod transform;
pub mod types;

pub use naming::{apply_file_names, attachment_file_name, sanitize_step_title, sanitize_test_title, test_dir_name};
pub use planned::{NoPlannedSteps, PlannedStepSource, SourceScanner};
pub use reconcile::{is_user_step, reconcile_planned_steps};
pub use transform::transform_results;
pub use types::{Attachment, StepError, StepRecord, StepStatus, TestRecord, TestRun};

use crate::runner::collector::CompletedTest;

/// Run the full pipeline over collected results, producing the final
/// immutable run document consumed by the sinks.
pub fn build_test_run(entries: &[CompletedTest], planned: &dyn PlannedStepSource) -> TestRun {
    let transformed = transform_results(entries);
    let reconciled = reconcile_planned_steps(transformed, planned);
    apply_file_names(reconciled)
}
