//! Render job orchestration.
//!
//! Each job runs as its own tokio task:
//! `pending -> processing -> (completed | failed)`.
//! Every failure, including a panic inside the task, ends up on the job's
//! `error` field; nothing is returned to whoever started the job.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{warn, Instrument};
use vcap_models::{JobId, RenderJob, VideoReference};
use vcap_storage::keys::{output_key, VIDEO_MP4};
use vcap_storage::{ObjectStore, StorageResult};

use crate::config::PipelineConfig;
use crate::error::{RenderError, RenderResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::store::JobStore;
use crate::worker::{RenderRequest, RenderWorker};

/// Turn a video reference into a URL an external service can fetch.
///
/// Storage keys are presigned for `ttl`; URLs are passed through.
pub(crate) async fn resolve_media_url(
    storage: &dyn ObjectStore,
    reference: &VideoReference,
    ttl: Duration,
) -> StorageResult<String> {
    match reference {
        VideoReference::Url(url) => Ok(url.clone()),
        VideoReference::StorageKey(key) => storage.presign(key.trim_start_matches('/'), ttl).await,
    }
}

/// Drives render jobs from `pending` to a terminal state.
#[derive(Clone)]
pub struct RenderOrchestrator {
    store: JobStore,
    storage: Arc<dyn ObjectStore>,
    worker: Arc<dyn RenderWorker>,
    config: PipelineConfig,
}

impl RenderOrchestrator {
    pub fn new(
        store: JobStore,
        storage: Arc<dyn ObjectStore>,
        worker: Arc<dyn RenderWorker>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            storage,
            worker,
            config,
        }
    }

    /// Start executing a job in the background and return immediately.
    ///
    /// The handle may be dropped; progress is observable through the store.
    pub fn start(&self, job_id: JobId) -> JoinHandle<()> {
        let orchestrator = self.clone();
        let span = JobLogger::new(&job_id).create_span();
        tokio::spawn(async move { orchestrator.run(job_id).await }.instrument(span))
    }

    async fn run(&self, job_id: JobId) {
        let logger = JobLogger::new(&job_id);

        let job = match self
            .store
            .update(&job_id, |job| job.start().map(|_| job.clone()))
            .await
        {
            Ok(Ok(job)) => job,
            Ok(Err(e)) => {
                logger.log_warning(&format!("not started: {}", e));
                return;
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Cannot start unknown render job");
                return;
            }
        };

        metrics::record_job_started();
        logger.log_start(&format!(
            "{} captions, style {}",
            job.captions.len(),
            job.style
        ));

        let outcome = match AssertUnwindSafe(self.execute(&job, &logger))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => Err(RenderError::Panicked(panic_message(panic.as_ref()))),
        };

        self.finish(&job_id, outcome, &logger).await;
    }

    async fn execute(&self, job: &RenderJob, logger: &JobLogger) -> RenderResult<String> {
        let video_url = resolve_media_url(
            self.storage.as_ref(),
            &job.video_reference,
            self.config.input_url_ttl,
        )
        .await
        .map_err(|e| RenderError::resolve_failed(e.to_string()))?;
        logger.log_progress("source video resolved");

        let request = RenderRequest::new(&job.id, video_url, job.captions.clone(), job.style);
        let output_location = tokio::time::timeout(
            self.config.render_timeout,
            self.worker.render(&request),
        )
        .await
        .map_err(|_| RenderError::Timeout(self.config.render_timeout))??;
        logger.log_progress(&format!("worker produced {}", output_location));

        let bytes = self.worker.download(&output_location).await?;
        let key = output_key(job.id.as_str());
        let durable_url = self
            .storage
            .put(bytes, &key, VIDEO_MP4)
            .await
            .map_err(|e| RenderError::persist_failed(e.to_string()))?;

        match self.storage.presign(&key, self.config.output_url_ttl).await {
            Ok(url) => Ok(url),
            Err(e) => {
                logger.log_warning(&format!(
                    "presigning output failed, using durable URL: {}",
                    e
                ));
                Ok(durable_url)
            }
        }
    }

    async fn finish(&self, job_id: &JobId, outcome: RenderResult<String>, logger: &JobLogger) {
        let transition = match &outcome {
            Ok(output) => {
                let output = output.clone();
                self.store.update(job_id, move |job| job.complete(output)).await
            }
            Err(e) => {
                let message = e.to_string();
                self.store.update(job_id, move |job| job.fail(message)).await
            }
        };

        match (transition, outcome) {
            (Ok(Ok(())), Ok(output)) => {
                metrics::record_job_completed(logger.elapsed_ms() as f64 / 1000.0);
                logger.log_completion(&output);
            }
            (Ok(Ok(())), Err(e)) => {
                metrics::record_job_failed(e.stage());
                logger.log_error(&e.to_string());
            }
            (Ok(Err(e)), _) => logger.log_warning(&format!("final transition rejected: {}", e)),
            (Err(e), _) => logger.log_warning(&format!("job vanished before finishing: {}", e)),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
