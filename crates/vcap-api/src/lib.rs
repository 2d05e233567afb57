//! Axum HTTP API server.
//!
//! This crate provides:
//! - Upload and presign endpoints for source videos
//! - Synchronous transcription into captions and SRT
//! - Asynchronous render jobs with status polling
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
