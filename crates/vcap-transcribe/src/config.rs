//! Transcription configuration.

use std::time::Duration;

use crate::error::{TranscribeResult, TranscriptionError};
use crate::schedule::PollPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub api_key: String,
    pub base_url: String,
    /// Timeout for each individual HTTP request.
    pub request_timeout: Duration,
    pub poll: PollPolicy,
}

impl TranscriptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            poll: PollPolicy::default(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> TranscribeResult<Self> {
        let api_key = std::env::var("ASSEMBLYAI_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TranscriptionError::config_error("ASSEMBLYAI_KEY not set"))?;

        let defaults = PollPolicy::default();

        Ok(Self {
            api_key,
            base_url: std::env::var("ASSEMBLYAI_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                std::env::var("TRANSCRIPTION_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            poll: PollPolicy {
                max_attempts: std::env::var("TRANSCRIPTION_MAX_POLLS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_attempts),
                max_wait: std::env::var("TRANSCRIPTION_MAX_WAIT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.max_wait),
                ..defaults
            },
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
