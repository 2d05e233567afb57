//! Source video upload and presign handlers.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use vcap_storage::keys::{upload_key, VIDEO_MP4};
use vcap_storage::ObjectStore;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "video";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_url: String,
    pub s3_key: String,
}

/// MP4 files carry an `ftyp` box right after the 4-byte size.
fn looks_like_mp4(data: &[u8]) -> bool {
    data.len() >= 8 && &data[4..8] == b"ftyp"
}

fn extension_of(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_else(|| ".mp4".to_string())
}

/// Accept a multipart MP4 upload and store it under `uploads/`.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let extension = extension_of(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        if data.len() > state.config.max_upload_size {
            return Err(ApiError::payload_too_large(format!(
                "file exceeds {} bytes",
                state.config.max_upload_size
            )));
        }
        if extension != ".mp4" || !looks_like_mp4(&data) {
            return Err(ApiError::bad_request("Only MP4 videos are accepted"));
        }

        let key = upload_key(&Uuid::new_v4().to_string(), &extension);
        let size = data.len();
        let file_url = state
            .captions
            .storage()
            .put(data.to_vec(), &key, VIDEO_MP4)
            .await?;

        metrics::record_upload(size);
        info!(key = %key, bytes = size, "Video uploaded");

        return Ok(Json(UploadResponse {
            file_url,
            s3_key: key,
        }));
    }

    Err(ApiError::bad_request(format!(
        "Missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub s3_key: String,
}

#[derive(Debug, Serialize)]
pub struct PresignResponse {
    pub url: String,
}

/// Issue a temporary URL for a stored source video.
pub async fn presigned_url(
    State(state): State<AppState>,
    Json(request): Json<PresignRequest>,
) -> ApiResult<Json<PresignResponse>> {
    let key = request.s3_key.trim();
    if key.is_empty() {
        return Err(ApiError::bad_request("s3Key is required"));
    }

    let url = state.captions.presign_source(key).await?;
    Ok(Json(PresignResponse { url }))
}
