use crate::{SelectedFile, SubmissionHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked (or dropped) a file.
    FileSelected(SelectedFile),
    /// User clicked the submit button.
    SubmitClicked,
    /// Upload call returned a job handle.
    UploadSucceeded { handle: SubmissionHandle },
    /// Upload call failed (network error or non-success status).
    UploadFailed { error: String },
    /// Poll timer fired.
    PollTick,
    /// Poll call for `attempt` returned a progress report.
    PollSucceeded {
        handle: SubmissionHandle,
        attempt: u32,
        progress: u8,
        transcript: String,
    },
    /// Poll call for `attempt` failed; treated as transient.
    PollFailed {
        handle: SubmissionHandle,
        attempt: u32,
        error: String,
    },
    /// User asked to start over after a terminal state.
    ResetClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
