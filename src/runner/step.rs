//! Step interceptor: wrap-and-forward around the runner's step primitive.
//!
//! `StepRunner` decorates step execution with post-step screenshot capture.
//! The context (page handle, attachment sink, screenshot settings) is injected
//! at composition time and scoped to one test execution; there is no shared
//! process-wide context slot, so concurrent workers each hold their own.

use std::sync::Arc;

use super::capture::{AttachmentSink, PageHandle, capture_step_screenshot};
use crate::config::ScreenshotSettings;

/// Per-test context handed to the step interceptor at composition time
#[derive(Clone)]
pub struct StepContext {
    /// Live page under test
    pub page: Arc<dyn PageHandle>,
    /// Runner attachment mechanism for the current test
    pub sink: Arc<dyn AttachmentSink>,
}

impl StepContext {
    /// Create a context from a page handle and attachment sink
    pub fn new(page: Arc<dyn PageHandle>, sink: Arc<dyn AttachmentSink>) -> Self {
        Self { page, sink }
    }
}

/// Decorator around the runner's step-execution primitive.
///
/// Every step run through it triggers a post-step screenshot regardless of
/// outcome; failures are re-raised unchanged. Transparent to nesting: a step
/// body may call `step` again through the same runner.
pub struct StepRunner {
    context: StepContext,
    settings: ScreenshotSettings,
}

impl StepRunner {
    /// Compose a step runner for one test execution
    pub fn new(context: StepContext, settings: ScreenshotSettings) -> Self {
        Self { context, settings }
    }

    /// Execute a step body with automatic post-step capture.
    ///
    /// On success, captures tagged no-error and returns the body's value.
    /// On failure, captures tagged error and re-raises the original error
    /// unchanged. Capture failures are logged inside the capturer and never
    /// mask the body's outcome.
    pub fn step<T, E>(&self, title: &str, body: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        match body() {
            Ok(value) => {
                self.capture(title, false);
                Ok(value)
            }
            Err(err) => {
                self.capture(title, true);
                Err(err)
            }
        }
    }

    /// Skip variant: forwards to the body without any capture side-effect
    pub fn step_skip<T, E>(&self, _title: &str, body: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        body()
    }

    fn capture(&self, title: &str, had_error: bool) {
        capture_step_screenshot(
            self.context.page.as_ref(),
            self.context.sink.as_ref(),
            title,
            had_error,
            &self.settings,
        );
    }
}
