//! Page capture abstraction and step screenshot side-effect.
//!
//! This module provides the seam between the reporter and the browser
//! automation engine:
//! - `PageHandle` for taking a visual snapshot of the page under test
//! - `AttachmentSink` for registering the snapshot with the runner
//! - `MockPage` / `RecordingSink` for testing without a browser
//!
//! Capture is strictly best-effort: any failure is logged and swallowed so it
//! can never change the outcome of the test being observed.

use std::sync::Mutex;

use tracing::warn;

use super::types::{AttachmentBody, CaptureError, CaptureResult, RawAttachment};
use crate::config::ScreenshotSettings;

/// Suffix appended to attachment names for error-path captures
pub const ERROR_MARKER: &str = "ERROR";

/// Trait for live page handles
///
/// Implementations wrap whatever the automation engine exposes for the page
/// under test. `MockPage` provides a deterministic in-memory implementation.
pub trait PageHandle: Send + Sync {
    /// Take a PNG screenshot of the page (full page or viewport)
    fn screenshot(&self, full_page: bool) -> CaptureResult<Vec<u8>>;
}

/// Trait for the runner's attachment mechanism
///
/// The real implementation registers the attachment on the runner's current
/// test context; `RecordingSink` collects them in memory.
pub trait AttachmentSink: Send + Sync {
    /// Register an attachment under the current step
    fn attach(&self, name: &str, media_type: &str, body: AttachmentBody);
}

/// Conditionally capture a screenshot after a step and register it.
///
/// Skips entirely when screenshots are disabled, or when configured
/// only-on-failure and the step succeeded. Error-path captures are attached
/// under `"{title} ERROR"` so downstream naming can flag them. Capture
/// failures are logged and swallowed; this function never fails.
pub fn capture_step_screenshot(
    page: &dyn PageHandle,
    sink: &dyn AttachmentSink,
    step_title: &str,
    had_error: bool,
    settings: &ScreenshotSettings,
) {
    if !settings.enabled {
        return;
    }
    if settings.only_on_failure && !had_error {
        return;
    }

    match page.screenshot(settings.full_page) {
        Ok(bytes) => {
            let name = if had_error {
                format!("{} {}", step_title, ERROR_MARKER)
            } else {
                step_title.to_string()
            };
            sink.attach(&name, "image/png", AttachmentBody::Binary(bytes));
        }
        Err(err) => {
            warn!(step = step_title, error = %err, "step screenshot capture failed");
        }
    }
}

/// A deterministic in-memory page for testing
///
/// Produces PNG-magic-prefixed byte buffers so payloads are recognizable in
/// assertions, and can be armed to fail to exercise the swallow path.
#[derive(Debug, Default)]
pub struct MockPage {
    fail: Mutex<bool>,
    captures: Mutex<usize>,
}

impl MockPage {
    /// Create a mock page that captures successfully
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm or disarm capture failure for subsequent screenshots
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Number of screenshots taken so far
    pub fn capture_count(&self) -> usize {
        *self.captures.lock().unwrap()
    }
}

impl PageHandle for MockPage {
    fn screenshot(&self, full_page: bool) -> CaptureResult<Vec<u8>> {
        if *self.fail.lock().unwrap() {
            return Err(CaptureError::Page("mock page armed to fail".to_string()));
        }
        let mut count = self.captures.lock().unwrap();
        *count += 1;
        // PNG signature followed by a marker encoding the capture mode
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(if full_page { b"full" } else { b"view" });
        bytes.extend_from_slice(format!("#{}", *count).as_bytes());
        Ok(bytes)
    }
}

/// An in-memory attachment sink that records everything attached to it
#[derive(Debug, Default)]
pub struct RecordingSink {
    attachments: Mutex<Vec<RawAttachment>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded attachments, leaving the sink empty
    pub fn drain(&self) -> Vec<RawAttachment> {
        std::mem::take(&mut self.attachments.lock().unwrap())
    }

    /// Number of attachments currently recorded
    pub fn len(&self) -> usize {
        self.attachments.lock().unwrap().len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttachmentSink for RecordingSink {
    fn attach(&self, name: &str, media_type: &str, body: AttachmentBody) {
        self.attachments.lock().unwrap().push(RawAttachment {
            name: name.to_string(),
            media_type: media_type.to_string(),
            body: Some(body),
        });
    }
}
