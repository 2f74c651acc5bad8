use srtify_core::{AppViewModel, SubmissionState};

/// One-line status for the current snapshot, or `None` before a file is chosen.
///
/// The processing notice stands in for the status until the first poll, so it
/// is shown once per submission.
pub fn status_line(view: &AppViewModel) -> Option<String> {
    let name = view.selected_file_name.as_deref()?;
    let line = match &view.submission {
        SubmissionState::Idle => format!("Selected: {name}"),
        SubmissionState::Uploading => format!("{} {name}", view.submit_label.text()),
        SubmissionState::Processing {
            snapshot,
            poll_attempt,
            ..
        } => match (view.processing_notice, poll_attempt) {
            (Some(notice), 0) => notice.to_string(),
            _ => format!(
                "{} {}% (poll {})",
                view.activity.unwrap_or_default(),
                snapshot.percent_complete,
                poll_attempt
            ),
        },
        SubmissionState::Completed { .. } => view.activity.unwrap_or_default().to_string(),
        SubmissionState::Failed { .. } => view.error_message.unwrap_or_default().to_string(),
    };
    Some(line)
}

/// Closing block printed once the submission is terminal.
pub fn summary(view: &AppViewModel, download_url: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if !view.transcript_preview.is_empty() {
        lines.push("Transcript Preview:".to_string());
        lines.extend(view.transcript_preview.iter().map(|line| format!("  {line}")));
    }
    if let (Some(link), Some(url)) = (&view.download, download_url) {
        lines.push(format!("Download SRT File ({}): {url}", link.suggested_filename));
    }
    if let Some(message) = view.error_message {
        lines.push(message.to_string());
    }
    lines
}

/// Prints status lines, skipping repeats of the previous one.
#[derive(Debug, Default)]
pub struct StatusPrinter {
    last: Option<String>,
}

impl StatusPrinter {
    /// Returns the line to print when it differs from the previous one.
    pub fn next_line(&mut self, view: &AppViewModel) -> Option<String> {
        let line = status_line(view)?;
        if self.last.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last = Some(line.clone());
        Some(line)
    }
}
