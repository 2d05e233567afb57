//! Pipeline error types.

use std::time::Duration;

use thiserror::Error;
use vcap_models::{JobId, TransitionError, ValidationError};
use vcap_storage::StorageError;
use vcap_transcribe::TranscriptionError;

pub type StoreResult<T> = Result<T, StoreError>;
pub type RenderResult<T> = Result<T, RenderError>;
pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Render job not found: {0}")]
    NotFound(JobId),
}

/// A failure while executing a render job. Recorded on the job, never returned
/// to the job's creator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to resolve source video: {0}")]
    ResolveFailed(String),

    #[error("Render worker request failed: {0}")]
    WorkerFailed(String),

    #[error("Render worker reported failure: {0}")]
    WorkerRejected(String),

    #[error("render timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to download rendered video: {0}")]
    DownloadFailed(String),

    #[error("Failed to store rendered video: {0}")]
    PersistFailed(String),

    #[error("Render task panicked: {0}")]
    Panicked(String),
}

impl RenderError {
    pub fn resolve_failed(msg: impl Into<String>) -> Self {
        Self::ResolveFailed(msg.into())
    }

    pub fn worker_failed(msg: impl Into<String>) -> Self {
        Self::WorkerFailed(msg.into())
    }

    pub fn worker_rejected(msg: impl Into<String>) -> Self {
        Self::WorkerRejected(msg.into())
    }

    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    pub fn persist_failed(msg: impl Into<String>) -> Self {
        Self::PersistFailed(msg.into())
    }

    /// Metric label for the failing step.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ResolveFailed(_) => "resolve",
            Self::WorkerFailed(_) | Self::WorkerRejected(_) => "render",
            Self::Timeout(_) => "timeout",
            Self::DownloadFailed(_) => "download",
            Self::PersistFailed(_) => "persist",
            Self::Panicked(_) => "panic",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Render job not found: {0}")]
    NotFound(JobId),

    #[error("Invalid job transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render worker error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PipelineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}
