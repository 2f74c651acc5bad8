use std::fmt;

use crate::view_model::AppViewModel;
use crate::{PollPolicy, SelectedFile};

/// Opaque job identifier returned by the service on a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionHandle(String);

impl SubmissionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latest known progress of a job. Each poll response replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub percent_complete: u8,
    pub partial_transcript: String,
}

impl ProgressSnapshot {
    pub const COMPLETE: u8 = 100;

    pub fn new(percent_complete: u8, partial_transcript: impl Into<String>) -> Self {
        Self {
            percent_complete: percent_complete.min(Self::COMPLETE),
            partial_transcript: partial_transcript.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percent_complete >= Self::COMPLETE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The upload call failed at the network level or with a non-success status.
    Upload,
    /// The attempt ceiling was exceeded before the job completed.
    Timeout,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Upload => "upload failed",
            FailureReason::Timeout => "timeout",
        }
    }

    /// User-facing message rendered by the presentation layer.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::Upload => "Upload or processing failed. Please try again.",
            FailureReason::Timeout => "Processing is taking too long. Please try again later.",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Uploading,
    Processing {
        handle: SubmissionHandle,
        snapshot: ProgressSnapshot,
        poll_attempt: u32,
    },
    Completed {
        handle: SubmissionHandle,
        snapshot: ProgressSnapshot,
    },
    Failed {
        reason: FailureReason,
    },
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Completed { .. } | SubmissionState::Failed { .. }
        )
    }

    pub fn handle(&self) -> Option<&SubmissionHandle> {
        match self {
            SubmissionState::Processing { handle, .. }
            | SubmissionState::Completed { handle, .. } => Some(handle),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&ProgressSnapshot> {
        match self {
            SubmissionState::Processing { snapshot, .. }
            | SubmissionState::Completed { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            SubmissionState::Failed { reason } => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Uploading => "uploading",
            SubmissionState::Processing { .. } => "processing",
            SubmissionState::Completed { .. } => "completed",
            SubmissionState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected_file: Option<SelectedFile>,
    submission: SubmissionState,
    policy: PollPolicy,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PollPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_selected_file(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
        self.dirty = true;
    }

    pub(crate) fn transition(&mut self, next: SubmissionState) {
        if self.submission != next {
            self.submission = next;
            self.dirty = true;
        }
    }
}
