//! Normalized result schema: tests → steps → attachments.
//!
//! This is the stable JSON shape every sink consumes. Documents are produced
//! once by the pipeline and treated as immutable afterwards; sinks only read.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The top-level result document for one run, in test completion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    /// One record per executed test
    pub tests: Vec<TestRecord>,
}

/// One executed test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    /// Human-readable test name
    pub title: String,

    /// Identifier derived from the source file name; absent when the runner
    /// supplied no location metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Originating source file. Internal bookkeeping only: never serialized,
    /// and scrubbed by the reconciler before the document leaves the pipeline.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,

    /// Logical execution target the test ran under
    pub project_name: String,

    /// Steps in execution order; planned (unexecuted) steps follow executed ones
    pub steps: Vec<StepRecord>,
}

/// One step, executed or planned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Step label
    pub title: String,

    /// Outcome; `InProgress` marks planned-but-not-executed placeholders
    pub status: StepStatus,

    /// Present iff the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,

    /// Captured artifacts in capture order; empty for planned steps
    pub attachments: Vec<Attachment>,
}

impl StepRecord {
    /// Create a placeholder for a planned step that never ran
    pub fn planned(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: StepStatus::InProgress,
            error: None,
            attachments: Vec::new(),
        }
    }
}

/// Step outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// The step ran and succeeded
    #[serde(rename = "passed")]
    Passed,

    /// The step ran and failed
    #[serde(rename = "failed")]
    Failed,

    /// The step was planned but never reached
    #[serde(rename = "inProgress")]
    InProgress,
}

/// Error captured from a failed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepError {
    /// Error message
    pub message: String,

    /// Stack trace, if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// One captured artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Derived, filesystem-safe name, unique within its step
    pub file_name: String,

    /// MIME-like tag ("image/png", "text/plain", ...)
    pub media_type: String,

    /// Base64 text for binary media, raw text otherwise; absent when the
    /// runner dropped the body or the report excludes payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// True iff the artifact's name signals an error-path capture
    pub is_error_artifact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_step_status_serialization() {
        assert_eq!(serde_json::to_string(&StepStatus::Passed).unwrap(), "\"passed\"");
        assert_eq!(serde_json::to_string(&StepStatus::Failed).unwrap(), "\"failed\"");
        assert_eq!(
            serde_json::to_string(&StepStatus::InProgress).unwrap(),
            "\"inProgress\""
        );
    }

    #[test]
    fn test_source_path_never_serialized() {
        let record = TestRecord {
            title: "login works".to_string(),
            key: Some("TC-001".to_string()),
            source_path: Some(PathBuf::from("/repo/tests/TC-001.spec.ts")),
            project_name: "chromium".to_string(),
            steps: vec![],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("sourcePath"));
        assert!(!json.contains("TC-001.spec.ts"));
        assert!(json.contains("\"projectName\":\"chromium\""));
    }

    #[test]
    fn test_json_round_trip() {
        let run = TestRun {
            tests: vec![TestRecord {
                title: "cart".to_string(),
                key: None,
                source_path: None,
                project_name: "firefox".to_string(),
                steps: vec![
                    StepRecord {
                        title: "add item".to_string(),
                        status: StepStatus::Failed,
                        error: Some(StepError {
                            message: "timeout".to_string(),
                            stack: Some("at add()".to_string()),
                        }),
                        attachments: vec![Attachment {
                            file_name: "step_1_add_item_ERROR.png".to_string(),
                            media_type: "image/png".to_string(),
                            payload: Some("aGVsbG8=".to_string()),
                            is_error_artifact: true,
                        }],
                    },
                    StepRecord::planned("checkout"),
                ],
            }],
        };

        let json = serde_json::to_string_pretty(&run).unwrap();
        let parsed: TestRun = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, run);
    }
}
