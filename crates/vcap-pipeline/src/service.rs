//! Caller-facing caption service.
//!
//! Ties the pieces together: transcription produces captions and a stored
//! SRT file; render jobs are validated, recorded and handed to the
//! orchestrator.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vcap_models::{
    encode_srt, validate_captions, Caption, CaptionSegmenter, CaptionStyle, JobId, RenderJob,
    VideoReference,
};
use vcap_storage::keys::{caption_key, TEXT_PLAIN};
use vcap_storage::ObjectStore;
use vcap_transcribe::Transcriber;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::metrics;
use crate::orchestrator::{resolve_media_url, RenderOrchestrator};
use crate::store::JobStore;
use crate::worker::RenderWorker;

/// Captions produced for a media file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionOutcome {
    pub captions: Vec<Caption>,
    /// Durable URL of the stored SRT file; `None` when the upload failed.
    pub subtitle_reference: Option<String>,
}

#[derive(Clone)]
pub struct CaptionService {
    store: JobStore,
    storage: Arc<dyn ObjectStore>,
    transcriber: Transcriber,
    orchestrator: RenderOrchestrator,
    worker: Arc<dyn RenderWorker>,
    segmenter: CaptionSegmenter,
    config: PipelineConfig,
}

impl CaptionService {
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        transcriber: Transcriber,
        worker: Arc<dyn RenderWorker>,
        config: PipelineConfig,
    ) -> Self {
        let store = JobStore::new();
        let orchestrator =
            RenderOrchestrator::new(store.clone(), storage.clone(), worker.clone(), config.clone());

        Self {
            store,
            storage,
            transcriber,
            orchestrator,
            worker,
            segmenter: CaptionSegmenter::with_max_words(config.max_words_per_caption),
            config,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn storage(&self) -> &Arc<dyn ObjectStore> {
        &self.storage
    }

    /// Temporary URL for a stored source video.
    pub async fn presign_source(&self, key: &str) -> PipelineResult<String> {
        Ok(self.storage.presign(key, self.config.input_url_ttl).await?)
    }

    /// Validate the captions, record a pending job and start rendering it.
    pub async fn create_render_job(
        &self,
        video_reference: VideoReference,
        captions: Vec<Caption>,
        style: CaptionStyle,
    ) -> PipelineResult<RenderJob> {
        validate_captions(&captions)?;

        let job = self.store.create(video_reference, captions, style).await;
        metrics::record_job_created(style.as_str());
        info!(
            job_id = %job.id,
            source = %job.video_reference,
            captions = job.captions.len(),
            "Render job created"
        );

        self.orchestrator.start(job.id.clone());
        Ok(job)
    }

    pub async fn get_render_job(&self, job_id: &JobId) -> PipelineResult<RenderJob> {
        Ok(self.store.get(job_id).await?)
    }

    /// Fetch a rendered file straight from the render worker.
    pub async fn download_render(&self, file_name: &str) -> PipelineResult<Vec<u8>> {
        Ok(self.worker.download(file_name).await?)
    }

    /// Transcribe a media file into captions and store them as SRT.
    pub async fn transcribe(&self, media: &VideoReference) -> PipelineResult<TranscriptionOutcome> {
        self.transcribe_with_cancel(media, &CancellationToken::new())
            .await
    }

    /// Like [`transcribe`](Self::transcribe), aborting when `cancel` fires.
    pub async fn transcribe_with_cancel(
        &self,
        media: &VideoReference,
        cancel: &CancellationToken,
    ) -> PipelineResult<TranscriptionOutcome> {
        let media_url =
            resolve_media_url(self.storage.as_ref(), media, self.config.input_url_ttl).await?;

        let transcript = self
            .transcriber
            .transcribe_with_cancel(&media_url, cancel)
            .await?;

        let captions = self.segmenter.segment(&transcript.words);
        let srt = encode_srt(&captions)?;

        let key = caption_key(Utc::now());
        let subtitle_reference = match self
            .storage
            .put(srt.into_bytes(), &key, TEXT_PLAIN)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                metrics::record_subtitle_upload_failure();
                warn!(key = %key, error = %e, "Failed to store SRT; returning captions only");
                None
            }
        };

        info!(
            transcript_id = %transcript.id,
            captions = captions.len(),
            "Captions generated"
        );

        Ok(TranscriptionOutcome {
            captions,
            subtitle_reference,
        })
    }
}
