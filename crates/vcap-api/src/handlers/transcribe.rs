//! Transcription handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use vcap_models::{Caption, VideoReference};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub captions: Vec<Caption>,
    /// `null` when the SRT could not be stored.
    pub srt_url: Option<String>,
}

/// Transcribe a stored or remote video into captions.
///
/// Blocks until the transcript is ready or the poll budget runs out.
pub async fn transcribe(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> ApiResult<Json<TranscribeResponse>> {
    let media = VideoReference::from_parts(request.s3_key.as_deref(), request.file_url.as_deref())
        .ok_or_else(|| ApiError::bad_request("s3Key or fileUrl is required"))?;

    let outcome = state.captions.transcribe(&media).await?;

    Ok(Json(TranscribeResponse {
        captions: outcome.captions,
        srt_url: outcome.subtitle_reference,
    }))
}
