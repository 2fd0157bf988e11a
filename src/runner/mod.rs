pub mod capture;
pub mod collector;
pub mod step;
pub mod types;

pub use capture::{AttachmentSink, MockPage, PageHandle, RecordingSink, capture_step_screenshot};
pub use collector::{CompletedTest, ResultCollector};
pub use step::{StepContext, StepRunner};
pub use types::{
    AttachmentBody, CaptureError, CaptureResult, RawAttachment, RawError, RawStep, TestCase,
    TestOutcome,
};
