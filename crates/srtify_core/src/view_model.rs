use crate::{AppState, ProgressSnapshot, SubmissionHandle, SubmissionState};

pub const PROCESSING_NOTICE: &str =
    "Processing your file... This may take a few minutes for large uploads.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitButtonLabel {
    #[default]
    Submit,
    Uploading,
    Processing,
}

impl SubmitButtonLabel {
    pub fn text(&self) -> &'static str {
        match self {
            SubmitButtonLabel::Submit => "Upload & Generate SRT",
            SubmitButtonLabel::Uploading => "Uploading...",
            SubmitButtonLabel::Processing => "Processing...",
        }
    }
}

/// Reference to the finished subtitle artifact. Resolved against the
/// service base URL by whoever fetches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub handle: SubmissionHandle,
    pub suggested_filename: String,
}

impl DownloadLink {
    pub fn for_handle(handle: &SubmissionHandle) -> Self {
        Self {
            handle: handle.clone(),
            suggested_filename: format!("subtitles-{}.srt", handle.as_str()),
        }
    }
}

/// Immutable snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub submission: SubmissionState,
    pub selected_file_name: Option<String>,
    pub submit_label: SubmitButtonLabel,
    pub can_submit: bool,
    pub processing_notice: Option<&'static str>,
    pub activity: Option<&'static str>,
    pub error_message: Option<&'static str>,
    pub progress: Option<ProgressSnapshot>,
    pub transcript_preview: Vec<String>,
    pub download: Option<DownloadLink>,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let submission = state.submission().clone();
        let selected_file_name = state.selected_file().map(|file| file.name().to_string());

        let submit_label = match submission {
            SubmissionState::Uploading => SubmitButtonLabel::Uploading,
            SubmissionState::Processing { .. } => SubmitButtonLabel::Processing,
            _ => SubmitButtonLabel::Submit,
        };
        let can_submit = selected_file_name.is_some() && submission == SubmissionState::Idle;

        let processing_notice = matches!(submission, SubmissionState::Processing { .. })
            .then_some(PROCESSING_NOTICE);
        let activity = match submission {
            SubmissionState::Uploading => Some("Uploading..."),
            SubmissionState::Processing { .. } => Some("Generating subtitles..."),
            SubmissionState::Completed { .. } => Some("Done!"),
            _ => None,
        };

        let (transcript_preview, download) = match &submission {
            SubmissionState::Completed { handle, snapshot } => (
                preview_lines(&snapshot.partial_transcript),
                Some(DownloadLink::for_handle(handle)),
            ),
            _ => (Vec::new(), None),
        };

        Self {
            selected_file_name,
            submit_label,
            can_submit,
            processing_notice,
            activity,
            error_message: submission.failure().map(|reason| reason.message()),
            progress: submission.snapshot().cloned(),
            transcript_preview,
            download,
            submission,
        }
    }
}

fn preview_lines(transcript: &str) -> Vec<String> {
    transcript
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
