//! Render pipeline.
//!
//! This crate provides:
//! - `JobStore`: concurrent in-memory render job records
//! - `RenderWorker`: the external render service contract and its HTTP client
//! - `RenderOrchestrator`: fire-and-forget execution of a job to a terminal state
//! - `CaptionService`: the caller-facing facade for transcription and render jobs

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod service;
pub mod store;
pub mod worker;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult, RenderError, RenderResult, StoreError, StoreResult};
pub use logging::JobLogger;
pub use orchestrator::RenderOrchestrator;
pub use service::{CaptionService, TranscriptionOutcome};
pub use store::JobStore;
pub use worker::{HttpRenderWorker, RenderRequest, RenderWorker, RenderWorkerConfig};
