use std::time::Duration;

use pretty_assertions::assert_eq;
use srtify_core::{DownloadLink, SelectedFile, SubmissionHandle};
use srtify_engine::{
    FailureKind, ProgressReport, ReqwestService, ServiceSettings, TranscriptionService,
};
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ReqwestService {
    ReqwestService::new(ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    })
    .expect("valid settings")
}

#[tokio::test]
async fn upload_posts_multipart_and_returns_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"lecture.mp4\""))
        .and(body_string_contains("video/mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file_id": "abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let file = SelectedFile::new("lecture.mp4", b"fake video".to_vec());

    let handle = service.upload(&file).await.expect("upload ok");
    assert_eq!(handle, SubmissionHandle::new("abc123"));
}

#[tokio::test]
async fn upload_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Upload failed: disk full"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service
        .upload(&SelectedFile::new("a.wav", vec![1, 2, 3]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn upload_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service
        .upload(&SelectedFile::new("a.wav", vec![1]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn progress_parses_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "progress": 45,
            "transcript": "Hello wor"
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let report = service
        .progress(&SubmissionHandle::new("abc123"))
        .await
        .expect("progress ok");
    assert_eq!(
        report,
        ProgressReport {
            progress: 45,
            transcript: "Hello wor".to_string(),
        }
    );
}

#[tokio::test]
async fn progress_defaults_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "progress": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/progress/big"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "progress": 250.0,
            "transcript": "x"
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let report = service
        .progress(&SubmissionHandle::new("xyz"))
        .await
        .expect("progress ok");
    assert_eq!(report, ProgressReport::default());

    let report = service
        .progress(&SubmissionHandle::new("big"))
        .await
        .expect("progress ok");
    assert_eq!(report.progress, 100);
}

#[tokio::test]
async fn progress_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service
        .progress(&SubmissionHandle::new("missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn progress_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "progress": 1, "transcript": "" })),
        )
        .mount(&server)
        .await;

    let service = ReqwestService::new(ServiceSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ServiceSettings::default()
    })
    .expect("valid settings");

    let err = service
        .progress(&SubmissionHandle::new("slow"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn download_returns_artifact_bytes() {
    let server = MockServer::start().await;
    let srt = "1\n00:00:00,000 --> 00:00:01,000\nHello world.\n";
    Mock::given(method("GET"))
        .and(path("/download/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(srt, "text/plain"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let link = DownloadLink::for_handle(&SubmissionHandle::new("abc123"));
    let bytes = service.download(&link).await.expect("download ok");
    assert_eq!(bytes.as_ref(), srt.as_bytes());
}

#[test]
fn download_url_is_resolved_against_base() {
    let service = ReqwestService::new(ServiceSettings {
        base_url: "http://example.com/api/".to_string(),
        ..ServiceSettings::default()
    })
    .expect("valid settings");
    let link = DownloadLink::for_handle(&SubmissionHandle::new("abc123"));

    assert_eq!(
        service.download_url(&link).expect("url").as_str(),
        "http://example.com/api/download/abc123"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestService::new(ServiceSettings {
        base_url: "not a url".to_string(),
        ..ServiceSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
