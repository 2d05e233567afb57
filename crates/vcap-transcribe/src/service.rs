//! Speech-to-text service contract.

use async_trait::async_trait;
use vcap_models::TranscriptionResult;

use crate::error::TranscribeResult;

/// External transcription service.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Submit a fetchable media URL and return the transcript id.
    async fn submit(&self, media_url: &str) -> TranscribeResult<String>;

    /// Fetch the current status of a transcript.
    async fn fetch(&self, transcript_id: &str) -> TranscribeResult<TranscriptionResult>;
}
