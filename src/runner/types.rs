//! Runner-native payload model and capture errors.
//!
//! These types mirror what a browser test runner hands to a reporter at the
//! end of a run: loosely-typed steps with optional statuses, error objects and
//! attachment blobs. They are validated and normalized at the transformer
//! boundary; nothing downstream of `report::transform` touches them.

use std::path::PathBuf;

/// A test case as known to the runner before/while it executes
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Human-readable test title
    pub title: String,

    /// Source file the test was declared in, if the runner knows it
    pub source_file: Option<PathBuf>,

    /// Logical execution target (e.g. browser/channel) the test ran under
    pub project_name: String,
}

impl TestCase {
    /// Create a test case with a known source file
    pub fn new(
        title: impl Into<String>,
        source_file: impl Into<PathBuf>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_file: Some(source_file.into()),
            project_name: project_name.into(),
        }
    }
}

/// The runner's end-of-test result for one test case
#[derive(Debug, Clone, Default)]
pub struct TestOutcome {
    /// Steps in execution order, as the runner recorded them
    pub steps: Vec<RawStep>,
}

/// One runner-native step, possibly with synthetic child steps
#[derive(Debug, Clone, Default)]
pub struct RawStep {
    /// Step title as declared in the test
    pub title: String,

    /// Runner-reported status string, if any ("passed", "failed", ...)
    pub status: Option<String>,

    /// Error carried by the step, present iff it failed
    pub error: Option<RawError>,

    /// Attachments declared directly on this step, in declaration order
    pub attachments: Vec<RawAttachment>,

    /// Immediate child steps (runners nest out-of-band attach calls here)
    pub substeps: Vec<RawStep>,
}

impl RawStep {
    /// Create a bare step with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A runner-native error object
#[derive(Debug, Clone)]
pub struct RawError {
    /// Error message
    pub message: String,
    /// Stack trace, if the runner captured one
    pub stack: Option<String>,
}

/// A runner-native attachment blob
#[derive(Debug, Clone)]
pub struct RawAttachment {
    /// Attachment name as registered with the runner
    pub name: String,
    /// MIME-like content type ("image/png", "text/plain", ...)
    pub media_type: String,
    /// Attachment content, if the runner kept it in memory
    pub body: Option<AttachmentBody>,
}

/// Attachment content in its native representation
#[derive(Debug, Clone)]
pub enum AttachmentBody {
    /// Binary content (screenshots, videos); base64-encoded by the transformer
    Binary(Vec<u8>),
    /// Textual content, carried through as-is
    Text(String),
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error types for page capture operations
#[derive(Debug)]
pub enum CaptureError {
    /// The page handle failed to produce a screenshot
    Page(String),

    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Page(msg) => write!(f, "Page capture error: {}", msg),
            CaptureError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Page(_) => None,
            CaptureError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err)
    }
}
