//! Writes image attachments from a run document to disk.
//!
//! Screenshots land under `{root}/{testKey}-{sanitizedTitle}-{projectName}/`,
//! mirroring the naming normalizer's directory convention. Per-attachment
//! decode failures are logged and skipped so one corrupt payload cannot sink
//! the rest of the run's artifacts.

use base64::Engine;
use std::fs;
use std::path::Path;

use tracing::warn;

use super::SinkError;
use crate::report::naming::test_dir_name;
use crate::report::types::TestRun;

/// Decode and write every image attachment; returns how many files were written
pub fn save_screenshots_to_disk(run: &TestRun, root: &Path) -> Result<usize, SinkError> {
    let mut written = 0usize;

    for test in &run.tests {
        let key = test.key.as_deref().unwrap_or("test");
        let dir = root.join(test_dir_name(key, &test.title, &test.project_name));

        for step in &test.steps {
            for attachment in &step.attachments {
                if attachment.media_type != "image/png" {
                    continue;
                }
                let Some(payload) = &attachment.payload else {
                    continue;
                };

                let bytes = match base64::engine::general_purpose::STANDARD.decode(payload) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!(
                            file = %attachment.file_name,
                            error = %err,
                            "skipping screenshot with undecodable payload"
                        );
                        continue;
                    }
                };

                fs::create_dir_all(&dir)?;
                fs::write(dir.join(&attachment.file_name), bytes)?;
                written += 1;
            }
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{Attachment, StepRecord, StepStatus, TestRecord};

    fn image(file_name: &str, payload: Option<&str>) -> Attachment {
        Attachment {
            file_name: file_name.to_string(),
            media_type: "image/png".to_string(),
            payload: payload.map(|s| s.to_string()),
            is_error_artifact: false,
        }
    }

    fn run() -> TestRun {
        TestRun {
            tests: vec![TestRecord {
                title: "User can log in!".to_string(),
                key: Some("TC-002".to_string()),
                source_path: None,
                project_name: "chromium".to_string(),
                steps: vec![StepRecord {
                    title: "Open page".to_string(),
                    status: StepStatus::Passed,
                    error: None,
                    attachments: vec![
                        image("step_1_open_page.png", Some("aGVsbG8=")),
                        Attachment {
                            file_name: "console.log".to_string(),
                            media_type: "text/plain".to_string(),
                            payload: Some("ignored".to_string()),
                            is_error_artifact: false,
                        },
                    ],
                }],
            }],
        }
    }

    #[test]
    fn test_writes_under_derived_directory() {
        let root = tempfile::tempdir().unwrap();

        let written = save_screenshots_to_disk(&run(), root.path()).unwrap();
        assert_eq!(written, 1);

        let expected = root
            .path()
            .join("TC-002-User-can-log-in-chromium")
            .join("step_1_open_page.png");
        assert_eq!(fs::read(expected).unwrap(), b"hello");
    }

    #[test]
    fn test_bad_payload_skipped_not_fatal() {
        let root = tempfile::tempdir().unwrap();
        let mut run = run();
        run.tests[0].steps[0]
            .attachments
            .insert(0, image("bad.png", Some("!!!not-base64!!!")));

        let written = save_screenshots_to_disk(&run, root.path()).unwrap();
        assert_eq!(written, 1);
        assert!(
            !root
                .path()
                .join("TC-002-User-can-log-in-chromium")
                .join("bad.png")
                .exists()
        );
    }

    #[test]
    fn test_payloadless_attachments_ignored() {
        let root = tempfile::tempdir().unwrap();
        let mut run = run();
        run.tests[0].steps[0].attachments = vec![image("empty.png", None)];

        let written = save_screenshots_to_disk(&run, root.path()).unwrap();
        assert_eq!(written, 0);
    }
}
