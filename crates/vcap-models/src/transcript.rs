//! Transcription status snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::caption::Word;

/// Status reported by the speech-to-text service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptStatus::Queued => "queued",
            TranscriptStatus::Processing => "processing",
            TranscriptStatus::Completed => "completed",
            TranscriptStatus::Error => "error",
        }
    }

    /// Check if polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Error)
    }
}

impl fmt::Display for TranscriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observation of a transcription request.
///
/// `words` is only populated once `status` is `Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub words: Vec<Word>,
    /// Failure detail from the service, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranscriptionResult {
    pub fn pending(id: impl Into<String>, status: TranscriptStatus) -> Self {
        Self {
            id: id.into(),
            status,
            words: Vec::new(),
            error: None,
        }
    }

    pub fn completed(id: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            id: id.into(),
            status: TranscriptStatus::Completed,
            words,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
