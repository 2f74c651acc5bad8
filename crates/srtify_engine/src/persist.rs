use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use srtify_core::DownloadLink;
use srtify_logging::srtify_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{ServiceError, TranscriptionService};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("refusing to write outside the output directory: {0:?}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not fetch subtitles: {0}")]
    Service(#[from] ServiceError),
    #[error("could not save subtitles: {0}")]
    Persist(#[from] PersistError),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes files into one directory via temp file + rename, so readers never
/// observe a half-written subtitle file.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        if !is_plain_filename(filename) {
            return Err(PersistError::InvalidFilename(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Fetches the artifact behind `link` and stores it under its suggested name.
pub async fn download_artifact(
    service: &dyn TranscriptionService,
    link: &DownloadLink,
    writer: &AtomicFileWriter,
) -> Result<PathBuf, ArtifactError> {
    let content: Bytes = service.download(link).await?;
    let path = writer.write(&link.suggested_filename, &content)?;
    srtify_info!("Saved {} bytes of subtitles to {:?}", content.len(), path);
    Ok(path)
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name)
}
