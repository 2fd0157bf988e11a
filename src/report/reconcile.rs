//! Reconciles executed steps with the statically-extracted planned list.
//!
//! When a test fails partway through, steps after the failure point never
//! execute and are absent from the runner's result. This stage reinstates
//! them as `inProgress` placeholders so report consumers see the full
//! intended script. It is also the boundary where internal bookkeeping
//! (source file paths) is scrubbed before the document becomes externally
//! visible.

use super::planned::PlannedStepSource;
use super::types::{StepRecord, TestRecord, TestRun};

/// Titles that mark runner lifecycle/hook/fixture steps, matched
/// case-insensitively as substrings
const DENY_CONTAINS: [&str; 4] = ["before hooks", "after hooks", "worker cleanup", "cleanup"];

/// Title prefixes of runner-internal steps
const DENY_PREFIXES: [&str; 6] = [
    "hook@",
    "fixture@",
    "pw:api@",
    "test.attach@",
    "test.before",
    "test.after",
];

/// True when a step title belongs to the user's script rather than the
/// runner's lifecycle machinery
pub fn is_user_step(title: &str) -> bool {
    let lower = title.to_lowercase();
    if DENY_CONTAINS.iter().any(|needle| lower.contains(needle)) {
        return false;
    }
    !DENY_PREFIXES.iter().any(|prefix| title.starts_with(prefix))
}

/// Merge executed steps with the planned list for every test in the run.
///
/// Produces a new document; the input is not mutated.
pub fn reconcile_planned_steps(run: TestRun, source: &dyn PlannedStepSource) -> TestRun {
    TestRun {
        tests: run
            .tests
            .into_iter()
            .map(|test| reconcile_test(test, source))
            .collect(),
    }
}

fn reconcile_test(test: TestRecord, source: &dyn PlannedStepSource) -> TestRecord {
    let executed: Vec<StepRecord> = test
        .steps
        .into_iter()
        .filter(|step| is_user_step(&step.title))
        .collect();

    let planned = match &test.source_path {
        Some(path) => source.planned_steps(path, &test.title),
        None => Vec::new(),
    };

    let steps = combine_steps(executed, planned);

    TestRecord {
        title: test.title,
        key: test.key,
        // External-visibility boundary: the source path goes no further
        source_path: None,
        project_name: test.project_name,
        steps,
    }
}

/// Executed user steps are assumed to be a strict prefix of the planned list;
/// every planned step beyond the executed count becomes a placeholder. No
/// fuzzy title matching, positional alignment only.
fn combine_steps(executed: Vec<StepRecord>, planned: Vec<String>) -> Vec<StepRecord> {
    let executed_count = executed.len();
    let mut steps = executed;
    steps.extend(
        planned
            .into_iter()
            .skip(executed_count)
            .map(StepRecord::planned),
    );
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::StepStatus;
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};

    struct FixedPlan(Vec<&'static str>);

    impl PlannedStepSource for FixedPlan {
        fn planned_steps(&self, _source: &Path, _test_title: &str) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    fn executed_step(title: &str) -> StepRecord {
        StepRecord {
            title: title.to_string(),
            status: StepStatus::Passed,
            error: None,
            attachments: vec![],
        }
    }

    fn record(steps: Vec<StepRecord>) -> TestRecord {
        TestRecord {
            title: "login".to_string(),
            key: Some("TC-1".to_string()),
            source_path: Some(PathBuf::from("tests/TC-1.spec.ts")),
            project_name: "chromium".to_string(),
            steps,
        }
    }

    #[test]
    fn test_user_step_denylist() {
        assert!(!is_user_step("Before Hooks"));
        assert!(!is_user_step("After Hooks"));
        assert!(!is_user_step("Worker Cleanup"));
        assert!(!is_user_step("fixture@page"));
        assert!(!is_user_step("hook@beforeEach"));
        assert!(!is_user_step("pw:api@click"));
        assert!(!is_user_step("test.attach@screenshot"));
        assert!(is_user_step("Open login page"));
        assert!(is_user_step("Clean the cart"));
    }

    #[test]
    fn test_prefix_alignment_property() {
        let executed = vec![executed_step("one")];
        let run = TestRun {
            tests: vec![record(executed.clone())],
        };
        let plan = FixedPlan(vec!["one", "two", "three"]);

        let reconciled = reconcile_planned_steps(run, &plan);
        let steps = &reconciled.tests[0].steps;

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], executed[0]);
        for placeholder in &steps[1..] {
            assert_eq!(placeholder.status, StepStatus::InProgress);
            assert!(placeholder.attachments.is_empty());
            assert!(placeholder.error.is_none());
        }
        assert_eq!(steps[1].title, "two");
        assert_eq!(steps[2].title, "three");
    }

    #[test]
    fn test_all_steps_executed_adds_nothing() {
        let run = TestRun {
            tests: vec![record(vec![executed_step("one"), executed_step("two")])],
        };
        let plan = FixedPlan(vec!["one", "two"]);

        let reconciled = reconcile_planned_steps(run, &plan);
        assert_eq!(reconciled.tests[0].steps.len(), 2);
    }

    #[test]
    fn test_lifecycle_steps_filtered_before_alignment() {
        let run = TestRun {
            tests: vec![record(vec![
                executed_step("Before Hooks"),
                executed_step("one"),
                executed_step("After Hooks"),
            ])],
        };
        let plan = FixedPlan(vec!["one", "two"]);

        let reconciled = reconcile_planned_steps(run, &plan);
        let titles: Vec<&str> = reconciled.tests[0]
            .steps
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[test]
    fn test_source_path_scrubbed() {
        let run = TestRun {
            tests: vec![record(vec![])],
        };
        let reconciled = reconcile_planned_steps(run, &FixedPlan(vec![]));
        assert_eq!(reconciled.tests[0].source_path, None);
    }

    #[test]
    fn test_missing_location_means_no_planned_steps() {
        let mut test = record(vec![executed_step("one")]);
        test.source_path = None;
        let run = TestRun { tests: vec![test] };

        // The plan would add steps, but without a location it is never consulted
        let reconciled = reconcile_planned_steps(run, &FixedPlan(vec!["one", "two", "three"]));
        assert_eq!(reconciled.tests[0].steps.len(), 1);
    }
}
