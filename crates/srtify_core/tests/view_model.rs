use pretty_assertions::assert_eq;
use srtify_core::{
    is_supported_extension, media_type_for_extension, update, AppState, DownloadLink, Msg,
    SelectedFile, SubmissionHandle, SubmitButtonLabel, PROCESSING_NOTICE,
};

fn run(msgs: Vec<Msg>) -> AppState {
    msgs.into_iter()
        .fold(AppState::new(), |state, msg| update(state, msg).0)
}

fn lecture() -> Msg {
    Msg::FileSelected(SelectedFile::new("lecture.MP4", b"data".to_vec()))
}

#[test]
fn idle_view_without_file_cannot_submit() {
    let view = AppState::new().view();

    assert_eq!(view.submit_label, SubmitButtonLabel::Submit);
    assert_eq!(view.submit_label.text(), "Upload & Generate SRT");
    assert!(!view.can_submit);
    assert_eq!(view.activity, None);
    assert_eq!(view.download, None);
}

#[test]
fn uploading_view_disables_submit() {
    let view = run(vec![lecture(), Msg::SubmitClicked]).view();

    assert_eq!(view.submit_label.text(), "Uploading...");
    assert!(!view.can_submit);
    assert_eq!(view.activity, Some("Uploading..."));
    assert_eq!(view.processing_notice, None);
}

#[test]
fn processing_view_shows_notice_but_no_preview() {
    let view = run(vec![
        lecture(),
        Msg::SubmitClicked,
        Msg::UploadSucceeded {
            handle: SubmissionHandle::new("abc123"),
        },
        Msg::PollTick,
        Msg::PollSucceeded {
            handle: SubmissionHandle::new("abc123"),
            attempt: 1,
            progress: 50,
            transcript: "Hello".to_string(),
        },
    ])
    .view();

    assert_eq!(view.submit_label, SubmitButtonLabel::Processing);
    assert_eq!(view.processing_notice, Some(PROCESSING_NOTICE));
    assert_eq!(view.activity, Some("Generating subtitles..."));
    assert_eq!(view.progress.map(|p| p.percent_complete), Some(50));
    assert!(view.transcript_preview.is_empty());
    assert_eq!(view.download, None);
}

#[test]
fn completed_view_exposes_preview_and_download() {
    let view = run(vec![
        lecture(),
        Msg::SubmitClicked,
        Msg::UploadSucceeded {
            handle: SubmissionHandle::new("abc123"),
        },
        Msg::PollTick,
        Msg::PollSucceeded {
            handle: SubmissionHandle::new("abc123"),
            attempt: 1,
            progress: 100,
            transcript: " Hello world. \n\n   \nSecond line\n".to_string(),
        },
    ])
    .view();

    assert_eq!(view.activity, Some("Done!"));
    assert!(!view.can_submit);
    assert_eq!(view.transcript_preview, vec![" Hello world. ", "Second line"]);
    assert_eq!(
        view.download,
        Some(DownloadLink {
            handle: SubmissionHandle::new("abc123"),
            suggested_filename: "subtitles-abc123.srt".to_string(),
        })
    );
}

#[test]
fn preview_keeps_indentation_of_transcript_lines() {
    let view = run(vec![
        lecture(),
        Msg::SubmitClicked,
        Msg::UploadSucceeded {
            handle: SubmissionHandle::new("abc123"),
        },
        Msg::PollTick,
        Msg::PollSucceeded {
            handle: SubmissionHandle::new("abc123"),
            attempt: 1,
            progress: 100,
            transcript: "Speaker 1:\n    Hello there.\n\t\nSpeaker 2:\n    Hi.".to_string(),
        },
    ])
    .view();

    assert_eq!(
        view.transcript_preview,
        vec!["Speaker 1:", "    Hello there.", "Speaker 2:", "    Hi."]
    );
}

#[test]
fn failed_view_shows_distinct_messages() {
    let upload_failed = run(vec![
        lecture(),
        Msg::SubmitClicked,
        Msg::UploadFailed {
            error: "500".to_string(),
        },
    ])
    .view();
    assert_eq!(
        upload_failed.error_message,
        Some("Upload or processing failed. Please try again.")
    );
    assert!(!upload_failed.can_submit);
}

#[test]
fn media_types_follow_extension() {
    assert_eq!(
        SelectedFile::new("lecture.MP4", Vec::new()).media_type(),
        "video/mp4"
    );
    assert_eq!(media_type_for_extension("mkv"), "video/x-matroska");
    assert_eq!(media_type_for_extension(".m4a"), "audio/mp4");
    assert_eq!(media_type_for_extension("txt"), "application/octet-stream");
    assert_eq!(
        SelectedFile::new("README", Vec::new()).media_type(),
        "application/octet-stream"
    );
}

#[test]
fn extension_filter_is_case_insensitive() {
    assert!(is_supported_extension("WAV"));
    assert!(is_supported_extension(".mov"));
    assert!(!is_supported_extension("pdf"));
    assert!(SelectedFile::new("a.b.Mp3", Vec::new()).has_supported_extension());
    assert!(!SelectedFile::new("noext", Vec::new()).has_supported_extension());
}
