//! Deterministic, filesystem-safe name derivation for tests and attachments.
//!
//! The derivation rules are load-bearing: the disk artifact writer and
//! external consumers rely on them byte-for-byte, so they are reproduced
//! exactly and covered by idempotence tests.

use super::types::TestRun;

/// Sanitize a test title for directory names.
///
/// Every run of non-alphanumeric characters becomes a single `-`, with
/// leading/trailing `-` trimmed. Output alphabet is `[A-Za-z0-9-]`, case
/// preserved. Idempotent.
pub fn sanitize_test_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Sanitize a step title for attachment file names.
///
/// Each non-alphanumeric character becomes `_`, the result is lowercased and
/// edge `_` are trimmed. Output alphabet is `[a-z0-9_]`. Idempotent.
pub fn sanitize_step_title(title: &str) -> String {
    let mapped: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    mapped.trim_matches('_').to_string()
}

/// Directory name for a test's artifacts: `{key}-{sanitizedTitle}-{project}`
pub fn test_dir_name(key: &str, title: &str, project_name: &str) -> String {
    format!("{}-{}-{}", key, sanitize_test_title(title), project_name)
}

/// File name for an image attachment:
/// `step_{1-based index}_{sanitizedStepTitle}{_ERROR}.png`
pub fn attachment_file_name(step_index: usize, step_title: &str, is_error: bool) -> String {
    let suffix = if is_error { "_ERROR" } else { "" };
    format!(
        "step_{}_{}{}.png",
        step_index + 1,
        sanitize_step_title(step_title),
        suffix
    )
}

/// Rewrite attachment file names across a run document.
///
/// Image attachments get the deterministic `step_N_...` name; non-image
/// attachments keep their runner-native name unchanged. Produces a new
/// document; the input is not mutated.
pub fn apply_file_names(run: TestRun) -> TestRun {
    TestRun {
        tests: run
            .tests
            .into_iter()
            .map(|mut test| {
                for (index, step) in test.steps.iter_mut().enumerate() {
                    for attachment in &mut step.attachments {
                        if attachment.media_type == "image/png" {
                            attachment.file_name = attachment_file_name(
                                index,
                                &step.title,
                                attachment.is_error_artifact,
                            );
                        }
                    }
                }
                test
            })
            .collect(),
    }
}
