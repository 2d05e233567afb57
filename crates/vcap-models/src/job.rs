//! Render job definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::caption::Caption;
use crate::error::TransitionError;
use crate::style::CaptionStyle;

/// Unique identifier for a render job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render job lifecycle status.
///
/// `Pending -> Processing -> (Completed | Failed)`. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    /// Job created, not yet picked up
    #[default]
    Pending,
    /// Orchestrator is working on the job
    Processing,
    /// Output rendered and stored
    Completed,
    /// Job failed; see the error field
    Failed,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Pending => "pending",
            RenderStatus::Processing => "processing",
            RenderStatus::Completed => "completed",
            RenderStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderStatus::Completed | RenderStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: RenderStatus) -> bool {
        matches!(
            (self, next),
            (RenderStatus::Pending, RenderStatus::Processing)
                | (RenderStatus::Processing, RenderStatus::Completed)
                | (RenderStatus::Processing, RenderStatus::Failed)
        )
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the source video lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoReference {
    /// Object key in the storage bucket; presigned before use
    StorageKey(String),
    /// Directly fetchable URL
    Url(String),
}

impl VideoReference {
    /// Pick the storage key when present, otherwise the URL.
    ///
    /// Returns `None` when both are missing or blank.
    pub fn from_parts(storage_key: Option<&str>, url: Option<&str>) -> Option<Self> {
        fn non_blank(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }

        non_blank(storage_key)
            .map(|key| VideoReference::StorageKey(key.to_string()))
            .or_else(|| non_blank(url).map(|url| VideoReference::Url(url.replace('\\', "/"))))
    }

    pub fn as_str(&self) -> &str {
        match self {
            VideoReference::StorageKey(key) => key,
            VideoReference::Url(url) => url,
        }
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoReference::StorageKey(key) => write!(f, "key:{}", key),
            VideoReference::Url(url) => write!(f, "url:{}", url),
        }
    }
}

/// A request to burn captions into a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    /// Unique job ID
    pub id: JobId,

    /// Lifecycle status
    pub status: RenderStatus,

    /// Source video
    pub video_reference: VideoReference,

    /// Captions to render
    pub captions: Vec<Caption>,

    /// Caption style forwarded to the worker
    pub style: CaptionStyle,

    /// Accessible URL of the rendered output (completed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_reference: Option<String>,

    /// Failure reason (failed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl RenderJob {
    /// Create a new pending job.
    pub fn new(video_reference: VideoReference, captions: Vec<Caption>, style: CaptionStyle) -> Self {
        let now = Utc::now();

        Self {
            id: JobId::new(),
            status: RenderStatus::Pending,
            video_reference,
            captions,
            style,
            output_reference: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition(&mut self, next: RenderStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Start processing the job.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(RenderStatus::Processing)
    }

    /// Mark job as completed with its output location.
    pub fn complete(&mut self, output_reference: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(RenderStatus::Completed)?;
        self.output_reference = Some(output_reference.into());
        self.error = None;
        Ok(())
    }

    /// Mark job as failed.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(RenderStatus::Failed)?;
        self.error = Some(error.into());
        self.output_reference = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> RenderJob {
        RenderJob::new(
            VideoReference::StorageKey("uploads/a.mp4".into()),
            vec![Caption::new(0.0, 1.0, "hi")],
            CaptionStyle::Bottom,
        )
    }

    #[test]
    fn test_job_creation() {
        let job = job();
        assert_eq!(job.status, RenderStatus::Pending);
        assert_eq!(job.created_at, job.updated_at);
        assert!(job.output_reference.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_job_state_transitions() {
        let mut job = job();

        job.start().unwrap();
        assert_eq!(job.status, RenderStatus::Processing);

        job.complete("https://cdn.example.com/out.mp4").unwrap();
        assert_eq!(job.status, RenderStatus::Completed);
        assert!(job.output_reference.is_some());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_job_failure_sets_error_only() {
        let mut job = job();
        job.start().unwrap();
        job.fail("worker exploded").unwrap();

        assert_eq!(job.status, RenderStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("worker exploded"));
        assert!(job.output_reference.is_none());
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut job = job();
        job.start().unwrap();
        job.complete("out").unwrap();

        let err = job.fail("late failure").unwrap_err();
        assert_eq!(err.from, RenderStatus::Completed);
        assert_eq!(job.status, RenderStatus::Completed);
        assert!(job.error.is_none());

        assert!(job.start().is_err());
    }

    #[test]
    fn test_start_happens_once() {
        let mut job = job();
        job.start().unwrap();
        assert!(job.start().is_err());
    }

    #[test]
    fn test_cannot_finish_without_processing() {
        let mut job = job();
        assert!(job.complete("out").is_err());
        assert!(job.fail("never started").is_err());
        assert_eq!(job.status, RenderStatus::Pending);
    }

    #[test]
    fn test_video_reference_prefers_storage_key() {
        assert_eq!(
            VideoReference::from_parts(Some("uploads/x.mp4"), Some("http://a/b.mp4")),
            Some(VideoReference::StorageKey("uploads/x.mp4".into()))
        );
        assert_eq!(
            VideoReference::from_parts(Some("  "), Some("uploads\\x.mp4")),
            Some(VideoReference::Url("uploads/x.mp4".into()))
        );
        assert_eq!(VideoReference::from_parts(None, None), None);
    }

    #[test]
    fn test_job_serialization_skips_unset_fields() {
        let value = serde_json::to_value(job()).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["video_reference"]["storage_key"], "uploads/a.mp4");
        assert!(value.get("output_reference").is_none());
        assert!(value.get("error").is_none());
    }
}
