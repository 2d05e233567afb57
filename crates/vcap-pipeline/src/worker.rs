//! Render worker contract and HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vcap_models::{Caption, CaptionStyle, JobId};

use crate::error::{RenderError, RenderResult};

/// Input for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub video_url: String,
    pub captions: Vec<Caption>,
    pub style: CaptionStyle,
    /// Where the worker should write its output.
    pub out_path: String,
}

impl RenderRequest {
    pub fn new(
        job_id: &JobId,
        video_url: impl Into<String>,
        captions: Vec<Caption>,
        style: CaptionStyle,
    ) -> Self {
        Self {
            video_url: video_url.into(),
            captions,
            style,
            out_path: format!("out/video_{}.mp4", job_id),
        }
    }
}

/// External service that burns captions into a video.
#[async_trait]
pub trait RenderWorker: Send + Sync {
    /// Render and return the worker-side output location.
    async fn render(&self, request: &RenderRequest) -> RenderResult<String>;

    /// Fetch the bytes at an output location returned by `render`.
    async fn download(&self, output_location: &str) -> RenderResult<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct RenderWorkerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for RenderWorkerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(600),
        }
    }
}

impl RenderWorkerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("RENDER_REMOTION_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.base_url),
            api_key: std::env::var("RENDER_API_KEY").ok().filter(|s| !s.is_empty()),
            request_timeout: std::env::var("RENDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderResponse {
    success: bool,
    #[serde(default)]
    out_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the HTTP render worker (`POST /render`, `GET /download/{file}`).
pub struct HttpRenderWorker {
    client: Client,
    config: RenderWorkerConfig,
}

impl HttpRenderWorker {
    pub fn new(config: RenderWorkerConfig) -> RenderResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RenderError::worker_failed(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }
}

/// Final path segment of a worker output location.
fn file_name(output_location: &str) -> &str {
    output_location
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(output_location)
}

#[async_trait]
impl RenderWorker for HttpRenderWorker {
    async fn render(&self, request: &RenderRequest) -> RenderResult<String> {
        let response = self
            .authorize(self.client.post(self.url("/render")))
            .json(request)
            .send()
            .await
            .map_err(|e| RenderError::worker_failed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RenderError::worker_failed(e.to_string()))?;

        // The worker reports failures as `{success: false, error}` with or
        // without an error status code.
        let parsed: Option<RenderResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(RenderResponse {
                success: true,
                out_path,
                ..
            }) if status.is_success() => {
                let out_path = out_path
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| request.out_path.clone());
                debug!(out_path = %out_path, "Render worker finished");
                Ok(out_path)
            }
            Some(RenderResponse { error, .. }) => Err(RenderError::worker_rejected(
                error.unwrap_or_else(|| format!("worker returned {}", status)),
            )),
            None => Err(RenderError::worker_failed(format!(
                "worker returned {}: {}",
                status, body
            ))),
        }
    }

    async fn download(&self, output_location: &str) -> RenderResult<Vec<u8>> {
        let path = format!("/download/{}", file_name(output_location));
        let response = self
            .authorize(self.client.get(self.url(&path)))
            .send()
            .await
            .map_err(|e| RenderError::download_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RenderError::download_failed(format!(
                "worker returned {} for {}",
                response.status(),
                path
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::download_failed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
