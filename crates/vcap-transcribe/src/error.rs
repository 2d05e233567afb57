//! Transcription error types.

use std::time::Duration;

use thiserror::Error;

pub type TranscribeResult<T> = Result<T, TranscriptionError>;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Submission failed: {0}")]
    SubmitFailed(String),

    #[error("Poll request failed: {0}")]
    RequestFailed(String),

    /// The service reported `error` for the transcript.
    #[error("transcription failed")]
    Failed {
        transcript_id: String,
        detail: Option<String>,
    },

    #[error("timeout after {attempts} polls ({elapsed:?})")]
    Timeout { attempts: u32, elapsed: Duration },

    #[error("transcription cancelled")]
    Cancelled,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TranscriptionError {
    pub fn submit_failed(msg: impl Into<String>) -> Self {
        Self::SubmitFailed(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn failed(transcript_id: impl Into<String>, detail: Option<String>) -> Self {
        Self::Failed {
            transcript_id: transcript_id.into(),
            detail,
        }
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Short, stable reason used in responses and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::SubmitFailed(_) => "submission failed",
            Self::RequestFailed(_) => "request failed",
            Self::Failed { .. } => "transcription failed",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::InvalidResponse(_) => "invalid response",
            Self::ConfigError(_) => "configuration error",
        }
    }
}
