//! Transforms runner-native results into the normalized schema.
//!
//! This is the validation boundary: loosely-typed runner payloads come in,
//! well-formed `TestRun` documents come out. Pure function, no I/O; binary
//! attachment bodies are base64-encoded here and nowhere else.

use base64::Engine;
use std::path::Path;

use super::types::{Attachment, StepError, StepRecord, StepStatus, TestRecord, TestRun};
use crate::runner::collector::CompletedTest;
use crate::runner::types::{AttachmentBody, RawAttachment, RawStep};

/// Source-file suffixes stripped when deriving a test key
const KEY_SUFFIXES: [&str; 2] = [".spec", ".test"];

/// Transform collected (test, outcome) pairs into a normalized run document
pub fn transform_results(entries: &[CompletedTest]) -> TestRun {
    TestRun {
        tests: entries.iter().map(transform_test).collect(),
    }
}

fn transform_test(entry: &CompletedTest) -> TestRecord {
    TestRecord {
        title: entry.test.title.clone(),
        key: entry.test.source_file.as_deref().and_then(derive_test_key),
        source_path: entry.test.source_file.clone(),
        project_name: entry.test.project_name.clone(),
        steps: entry.outcome.steps.iter().map(transform_step).collect(),
    }
}

/// Derive a test key from the source file name: stem with the extension
/// stripped, then a trailing `.spec`/`.test` marker stripped
/// (`TC-002.spec.ts` → `TC-002`).
fn derive_test_key(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    for suffix in KEY_SUFFIXES {
        if let Some(trimmed) = stem.strip_suffix(suffix) {
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    Some(stem.to_string())
}

fn transform_step(step: &RawStep) -> StepRecord {
    // Step-local attachments first, then attachments the runner nested under
    // synthetic child steps, in declaration order
    let mut attachments: Vec<Attachment> =
        step.attachments.iter().map(transform_attachment).collect();
    for substep in &step.substeps {
        attachments.extend(substep.attachments.iter().map(transform_attachment));
    }

    StepRecord {
        title: step.title.clone(),
        status: determine_status(step),
        error: step.error.as_ref().map(|e| StepError {
            message: e.message.clone(),
            stack: e.stack.clone(),
        }),
        attachments,
    }
}

/// Failed iff the step carries an error object; otherwise the native status,
/// defaulting to passed when absent or unrecognized
fn determine_status(step: &RawStep) -> StepStatus {
    if step.error.is_some() {
        return StepStatus::Failed;
    }
    match step.status.as_deref() {
        Some("failed") => StepStatus::Failed,
        _ => StepStatus::Passed,
    }
}

fn transform_attachment(attachment: &RawAttachment) -> Attachment {
    let payload = attachment.body.as_ref().map(|body| match body {
        AttachmentBody::Binary(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        AttachmentBody::Text(text) => text.clone(),
    });

    Attachment {
        file_name: attachment.name.clone(),
        media_type: attachment.media_type.clone(),
        payload,
        is_error_artifact: attachment.name.contains(crate::runner::capture::ERROR_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::types::{RawError, TestCase, TestOutcome};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn entry(steps: Vec<RawStep>) -> CompletedTest {
        CompletedTest {
            test: TestCase::new("login works", "tests/TC-002.spec.ts", "chromium"),
            outcome: TestOutcome { steps },
        }
    }

    fn png_attachment(name: &str) -> RawAttachment {
        RawAttachment {
            name: name.to_string(),
            media_type: "image/png".to_string(),
            body: Some(AttachmentBody::Binary(vec![1, 2, 3])),
        }
    }

    #[test]
    fn test_key_derivation() {
        assert_eq!(derive_test_key(Path::new("tests/TC-002.spec.ts")).unwrap(), "TC-002");
        assert_eq!(derive_test_key(Path::new("a/b/cart.test.js")).unwrap(), "cart");
        assert_eq!(derive_test_key(Path::new("plain.rs")).unwrap(), "plain");
    }

    #[test]
    fn test_key_absent_without_location() {
        let mut e = entry(vec![]);
        e.test.source_file = None;
        let run = transform_results(&[e]);
        assert_eq!(run.tests[0].key, None);
    }

    #[test]
    fn test_status_derivation() {
        let mut with_error = RawStep::new("s");
        with_error.status = Some("passed".to_string());
        with_error.error = Some(RawError {
            message: "boom".to_string(),
            stack: None,
        });

        let mut failed_status = RawStep::new("s");
        failed_status.status = Some("failed".to_string());

        let mut unknown_status = RawStep::new("s");
        unknown_status.status = Some("interrupted".to_string());

        let run = transform_results(&[entry(vec![
            with_error,
            failed_status,
            unknown_status,
            RawStep::new("bare"),
        ])]);

        let statuses: Vec<StepStatus> = run.tests[0].steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Failed,
                StepStatus::Failed,
                StepStatus::Passed,
                StepStatus::Passed
            ]
        );
        assert_eq!(run.tests[0].steps[0].error.as_ref().unwrap().message, "boom");
    }

    #[test]
    fn test_substep_attachments_follow_direct_ones() {
        let mut step = RawStep::new("Fill form");
        step.attachments = vec![png_attachment("direct")];
        let mut substep = RawStep::new("attach \"note\"");
        substep.attachments = vec![png_attachment("nested-1"), png_attachment("nested-2")];
        step.substeps = vec![substep];

        let run = transform_results(&[entry(vec![step])]);
        let names: Vec<&str> = run.tests[0].steps[0]
            .attachments
            .iter()
            .map(|a| a.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["direct", "nested-1", "nested-2"]);
    }

    #[test]
    fn test_binary_encoded_text_carried_raw() {
        let mut step = RawStep::new("s");
        step.attachments = vec![
            RawAttachment {
                name: "shot".to_string(),
                media_type: "image/png".to_string(),
                body: Some(AttachmentBody::Binary(b"hello".to_vec())),
            },
            RawAttachment {
                name: "log".to_string(),
                media_type: "text/plain".to_string(),
                body: Some(AttachmentBody::Text("plain note".to_string())),
            },
        ];

        let run = transform_results(&[entry(vec![step])]);
        let attachments = &run.tests[0].steps[0].attachments;
        assert_eq!(attachments[0].payload.as_deref(), Some("aGVsbG8="));
        assert_eq!(attachments[1].payload.as_deref(), Some("plain note"));
    }

    #[test]
    fn test_error_marker_sets_flag() {
        let mut step = RawStep::new("Submit");
        step.attachments = vec![png_attachment("Submit ERROR"), png_attachment("Submit")];

        let run = transform_results(&[entry(vec![step])]);
        let attachments = &run.tests[0].steps[0].attachments;
        assert!(attachments[0].is_error_artifact);
        assert!(!attachments[1].is_error_artifact);
    }

    #[test]
    fn test_transform_is_pure_and_order_preserving() {
        let steps = vec![RawStep::new("one"), RawStep::new("two"), RawStep::new("three")];
        let entries = vec![entry(steps)];

        let first = transform_results(&entries);
        let second = transform_results(&entries);
        assert_eq!(first, second);

        let titles: Vec<&str> = first.tests[0].steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
        // Internal bookkeeping survives until the reconciler scrubs it
        assert_eq!(
            first.tests[0].source_path,
            Some(PathBuf::from("tests/TC-002.spec.ts"))
        );
    }
}
