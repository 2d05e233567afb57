//! In-memory render job store.
//!
//! The map is guarded by a single `RwLock`. Mutations run synchronously under
//! the write guard, so each `update` is atomic and readers only ever observe
//! fully applied changes. Callers receive clones, never live references.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use vcap_models::{Caption, CaptionStyle, JobId, RenderJob, VideoReference};

use crate::error::{StoreError, StoreResult};

/// Process-lifetime store of render jobs.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, RenderJob>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending job and return a snapshot of it.
    pub async fn create(
        &self,
        video_reference: VideoReference,
        captions: Vec<Caption>,
        style: CaptionStyle,
    ) -> RenderJob {
        let mut jobs = self.jobs.write().await;

        let mut job = RenderJob::new(video_reference, captions, style);
        while jobs.contains_key(&job.id) {
            job.id = JobId::new();
        }

        debug!(job_id = %job.id, "Created render job");
        jobs.insert(job.id.clone(), job.clone());
        job
    }

    /// Snapshot of a job.
    pub async fn get(&self, id: &JobId) -> StoreResult<RenderJob> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Atomically apply `mutation` to a job and refresh its `updated_at`.
    ///
    /// The mutation's return value is passed back so fallible transitions can
    /// run under the same lock.
    pub async fn update<F, R>(&self, id: &JobId, mutation: F) -> StoreResult<R>
    where
        F: FnOnce(&mut RenderJob) -> R,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let result = mutation(job);
        job.updated_at = Utc::now();
        Ok(result)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
