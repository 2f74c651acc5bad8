use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use srtify_core::{DownloadLink, SelectedFile, SubmissionHandle};
use url::Url;

use crate::{FailureKind, ProgressReport, ServiceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Timeout for progress and download calls.
    pub request_timeout: Duration,
    /// Timeout for the upload call, which carries the whole media payload.
    pub upload_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            upload_timeout: Duration::from_secs(10 * 60),
        }
    }
}

/// The remote transcription service, consumed through its three endpoints.
#[async_trait::async_trait]
pub trait TranscriptionService: Send + Sync {
    /// `POST /upload`; returns the handle of the new job.
    async fn upload(&self, file: &SelectedFile) -> Result<SubmissionHandle, ServiceError>;

    /// `GET /progress/{file_id}`.
    async fn progress(&self, handle: &SubmissionHandle) -> Result<ProgressReport, ServiceError>;

    /// `GET /download/{file_id}`; the finished subtitle artifact.
    async fn download(&self, link: &DownloadLink) -> Result<Bytes, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct ProgressBody {
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    transcript: Option<String>,
}

impl From<ProgressBody> for ProgressReport {
    fn from(body: ProgressBody) -> Self {
        let progress = body.progress.unwrap_or(0.0);
        // NaN saturates to 0.
        let progress = progress.clamp(0.0, 100.0) as u8;
        Self {
            progress,
            transcript: body.transcript.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    settings: ServiceSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    /// Absolute URL of the artifact a completed submission exposes.
    pub fn download_url(&self, link: &DownloadLink) -> Result<Url, ServiceError> {
        self.endpoint(&["download", link.handle.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Bytes, ServiceError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response.bytes().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl TranscriptionService for ReqwestService {
    async fn upload(&self, file: &SelectedFile) -> Result<SubmissionHandle, ServiceError> {
        let url = self.endpoint(&["upload"])?;
        let payload = file.payload().clone();
        let part = Part::stream_with_length(reqwest::Body::from(payload), file.size() as u64)
            .file_name(file.name().to_string())
            .mime_str(file.media_type())
            .map_err(|err| ServiceError::new(FailureKind::InvalidRequest, err.to_string()))?;
        let form = Form::new().part("file", part);

        let body = self
            .send(
                self.client
                    .post(url)
                    .timeout(self.settings.upload_timeout)
                    .multipart(form),
            )
            .await?;
        let body: UploadBody = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        if body.file_id.trim().is_empty() {
            return Err(ServiceError::new(FailureKind::Decode, "empty file_id"));
        }
        Ok(SubmissionHandle::new(body.file_id))
    }

    async fn progress(&self, handle: &SubmissionHandle) -> Result<ProgressReport, ServiceError> {
        let url = self.endpoint(&["progress", handle.as_str()])?;
        let body = self.send(self.client.get(url)).await?;
        let body: ProgressBody = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        Ok(body.into())
    }

    async fn download(&self, link: &DownloadLink) -> Result<Bytes, ServiceError> {
        let url = self.download_url(link)?;
        self.send(self.client.get(url)).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ServiceError::new(FailureKind::InvalidRequest, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
