//! AssemblyAI v2 REST client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vcap_models::{TranscriptStatus, TranscriptionResult, Word};

use crate::config::TranscriptionConfig;
use crate::error::{TranscribeResult, TranscriptionError};
use crate::service::TranscriptionService;

/// AssemblyAI transcription client.
pub struct AssemblyAiService {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: TranscriptStatus,
    #[serde(default)]
    words: Option<Vec<TranscriptWord>>,
    #[serde(default)]
    error: Option<String>,
}

/// Word timing in milliseconds.
#[derive(Debug, Deserialize)]
struct TranscriptWord {
    text: String,
    start: u64,
    end: u64,
}

impl From<TranscriptResponse> for TranscriptionResult {
    fn from(response: TranscriptResponse) -> Self {
        TranscriptionResult {
            id: response.id,
            status: response.status,
            words: response
                .words
                .unwrap_or_default()
                .into_iter()
                .map(|w| Word::new(w.text, w.start, w.end))
                .collect(),
            error: response.error,
        }
    }
}

impl AssemblyAiService {
    pub fn new(config: &TranscriptionConfig) -> TranscribeResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TranscriptionError::config_error(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranscriptionService for AssemblyAiService {
    async fn submit(&self, media_url: &str) -> TranscribeResult<String> {
        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&SubmitRequest {
                audio_url: media_url,
            })
            .send()
            .await
            .map_err(|e| TranscriptionError::submit_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::submit_failed(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let transcript: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::invalid_response(e.to_string()))?;

        debug!(transcript_id = %transcript.id, "Transcript submitted");
        Ok(transcript.id)
    }

    async fn fetch(&self, transcript_id: &str) -> TranscribeResult<TranscriptionResult> {
        let response = self
            .client
            .get(format!("{}/transcript/{}", self.base_url, transcript_id))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| TranscriptionError::request_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::request_failed(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let transcript: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::invalid_response(e.to_string()))?;

        Ok(transcript.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> AssemblyAiService {
        AssemblyAiService::new(&TranscriptionConfig::new("test-key").with_base_url(server.uri()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_sends_audio_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .and(header("authorization", "test-key"))
            .and(body_json(json!({"audio_url": "https://media/a.mp4"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "t-1", "status": "queued"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let id = service(&server).await.submit("https://media/a.mp4").await.unwrap();
        assert_eq!(id, "t-1");
    }

    #[tokio::test]
    async fn test_submit_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = service(&server).await.submit("https://media/a.mp4").await.unwrap_err();
        assert!(matches!(err, TranscriptionError::SubmitFailed(_)));
    }

    #[tokio::test]
    async fn test_fetch_maps_words() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transcript/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t-1",
                "status": "completed",
                "words": [
                    {"text": "Hello", "start": 0, "end": 400, "confidence": 0.98},
                    {"text": "world", "start": 450, "end": 900, "confidence": 0.97}
                ]
            })))
            .mount(&server)
            .await;

        let result = service(&server).await.fetch("t-1").await.unwrap();
        assert_eq!(result.status, TranscriptStatus::Completed);
        assert_eq!(
            result.words,
            vec![Word::new("Hello", 0, 400), Word::new("world", 450, 900)]
        );
    }

    #[tokio::test]
    async fn test_fetch_null_words_while_processing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transcript/t-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t-2",
                "status": "processing",
                "words": null
            })))
            .mount(&server)
            .await;

        let result = service(&server).await.fetch("t-2").await.unwrap();
        assert_eq!(result.status, TranscriptStatus::Processing);
        assert!(result.words.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transcript/t-3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = service(&server).await.fetch("t-3").await.unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidResponse(_)));
    }
}
