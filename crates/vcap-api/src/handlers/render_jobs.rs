//! Render job handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use vcap_models::{Caption, CaptionStyle, JobId, RenderJob, VideoReference};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRenderJobRequest {
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    pub captions: Vec<Caption>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Create a render job; rendering continues in the background.
pub async fn create_render_job(
    State(state): State<AppState>,
    Json(request): Json<CreateRenderJobRequest>,
) -> ApiResult<(StatusCode, Json<RenderJob>)> {
    let video = VideoReference::from_parts(request.s3_key.as_deref(), request.video_url.as_deref())
        .ok_or_else(|| ApiError::bad_request("s3Key or videoUrl is required"))?;

    let style = match request.style.as_deref().map(str::trim) {
        None | Some("") => CaptionStyle::default(),
        Some(s) => s
            .parse::<CaptionStyle>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
    };

    let job = state
        .captions
        .create_render_job(video, request.captions, style)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// Current snapshot of a render job.
pub async fn get_render_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<RenderJob>> {
    let job = state
        .captions
        .get_render_job(&JobId::from_string(job_id))
        .await?;
    Ok(Json(job))
}
