//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use vcap_pipeline::{PipelineError, RenderError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Validation error: {0}")]
    Validation(#[from] vcap_models::ValidationError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] vcap_transcribe::TranscriptionError),

    #[error("Storage error: {0}")]
    Storage(#[from] vcap_storage::StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Transcription(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => ApiError::Validation(e),
            PipelineError::NotFound(id) => ApiError::not_found(format!("render job {}", id)),
            PipelineError::Transcription(e) => ApiError::Transcription(e),
            PipelineError::Storage(e) => ApiError::Storage(e),
            PipelineError::Render(e @ RenderError::DownloadFailed(_)) => {
                ApiError::not_found(e.to_string())
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = if self.is_internal()
            && std::env::var("ENVIRONMENT").unwrap_or_default() == "production"
        {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let code = match &self {
            ApiError::Transcription(e) => Some(e.reason()),
            _ => None,
        };

        (status, Json(ErrorResponse { detail, code })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcap_models::JobId;

    #[test]
    fn test_pipeline_error_mapping() {
        let not_found: ApiError = PipelineError::NotFound(JobId::from_string("x")).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: ApiError =
            PipelineError::Validation(vcap_models::ValidationError::invalid_caption(1, "empty"))
                .into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let missing_file: ApiError =
            PipelineError::Render(RenderError::download_failed("worker returned 404")).into();
        assert_eq!(missing_file.status_code(), StatusCode::NOT_FOUND);

        let rejected: ApiError =
            PipelineError::Render(RenderError::worker_rejected("busy")).into();
        assert_eq!(rejected.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let config: ApiError = PipelineError::config_error("missing").into();
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
