//! Application state.

use std::sync::Arc;

use vcap_pipeline::{CaptionService, HttpRenderWorker, PipelineConfig, RenderWorkerConfig};
use vcap_storage::S3Client;
use vcap_transcribe::{AssemblyAiService, Transcriber, TranscriptionConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub captions: CaptionService,
}

impl AppState {
    /// Build state from environment variables.
    pub fn from_env(config: ApiConfig) -> anyhow::Result<Self> {
        let storage = S3Client::from_env()?;

        let transcription = TranscriptionConfig::from_env()?;
        let service = AssemblyAiService::new(&transcription)?;
        let transcriber = Transcriber::new(Arc::new(service), transcription.poll.clone());

        let worker = HttpRenderWorker::new(RenderWorkerConfig::from_env())?;

        let captions = CaptionService::new(
            Arc::new(storage),
            transcriber,
            Arc::new(worker),
            PipelineConfig::from_env(),
        );

        Ok(Self::from_parts(config, captions))
    }

    pub fn from_parts(config: ApiConfig, captions: CaptionService) -> Self {
        Self { config, captions }
    }
}
