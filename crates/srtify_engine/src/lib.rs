//! Srtify engine: transcription service client and effect execution.
mod controller;
mod persist;
mod service;
mod types;

pub use controller::SubmissionController;
pub use persist::{
    download_artifact, ensure_output_dir, ArtifactError, AtomicFileWriter, PersistError,
};
pub use service::{ReqwestService, ServiceSettings, TranscriptionService, DEFAULT_BASE_URL};
pub use types::{FailureKind, ProgressReport, ServiceError};
