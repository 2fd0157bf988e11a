//! Pretty-printed JSON report persister.

use std::fs;
use std::path::{Path, PathBuf};

use super::SinkError;
use crate::config::REPORT_FILE_NAME;
use crate::report::types::TestRun;

/// Serialize the run document to `{output_dir}/test-results.json`.
///
/// Creates the directory (and parents) if absent and overwrites any previous
/// report. When `include_screenshots` is false, image payloads are stripped
/// from the persisted copy; the in-memory document is left untouched.
pub fn save_json_report(
    run: &TestRun,
    output_dir: &Path,
    include_screenshots: bool,
) -> Result<PathBuf, SinkError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(REPORT_FILE_NAME);

    let json = if include_screenshots {
        serde_json::to_string_pretty(run)?
    } else {
        serde_json::to_string_pretty(&without_image_payloads(run))?
    };

    fs::write(&path, json)?;
    Ok(path)
}

/// Parse a previously persisted report back into a run document
pub fn load_json_report(path: &Path) -> Result<TestRun, SinkError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn without_image_payloads(run: &TestRun) -> TestRun {
    let mut stripped = run.clone();
    for test in &mut stripped.tests {
        for step in &mut test.steps {
            for attachment in &mut step.attachments {
                if attachment.media_type == "image/png" {
                    attachment.payload = None;
                }
            }
        }
    }
    stripped
}
