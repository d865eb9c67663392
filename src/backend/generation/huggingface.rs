/**
 * Hugging Face Inference Client
 *
 * Sends a text prompt to the hosted text-to-image model and returns the raw
 * image bytes.
 *
 * # Model loading
 *
 * A cold model answers 503 with an `estimated_time` (seconds) in the JSON
 * body. That case surfaces as `BackendError::UpstreamTransient` so the
 * client can retry later; it is never retried here.
 */

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::error::{BackendError, BackendResult};

/// Wait suggested to the client when the model gives no estimate
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 20;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct LoadingBody {
    estimated_time: Option<f64>,
}

/// Parse the retry hint out of a 503 body
fn retry_after_from(body: &str) -> u64 {
    serde_json::from_str::<LoadingBody>(body)
        .ok()
        .and_then(|b| b.estimated_time)
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| secs.ceil() as u64)
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

pub struct HuggingFaceClient<'a> {
    client: &'a Client,
    api_url: &'a str,
    api_key: &'a str,
    timeout: Duration,
}

impl<'a> HuggingFaceClient<'a> {
    pub fn new(client: &'a Client, api_url: &'a str, api_key: &'a str, timeout: Duration) -> Self {
        Self {
            client,
            api_url,
            api_key,
            timeout,
        }
    }

    /// Generate one image for `prompt`
    pub async fn generate_image(&self, prompt: &str) -> BackendResult<Bytes> {
        let response = self
            .client
            .post(self.api_url)
            .bearer_auth(self.api_key)
            .timeout(self.timeout)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(|e| BackendError::generation(format!("Network error: {}", e)))?;

        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            let retry_after_secs = retry_after_from(&body);
            tracing::warn!("Image model is loading, retry in {}s", retry_after_secs);
            return Err(BackendError::UpstreamTransient { retry_after_secs });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(BackendError::generation(format!(
                "Inference failed: {} - {}",
                status, error_text
            )));
        }

        let image = response
            .bytes()
            .await
            .map_err(|e| BackendError::generation(format!("Failed to read image: {}", e)))?;

        if image.is_empty() {
            return Err(BackendError::generation("Inference returned an empty image"));
        }

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_retry_after_parsing() {
        assert_eq!(retry_after_from(r#"{"error":"loading","estimated_time":42.3}"#), 43);
        assert_eq!(retry_after_from(r#"{"error":"loading"}"#), DEFAULT_RETRY_AFTER_SECS);
        assert_eq!(retry_after_from("not json"), DEFAULT_RETRY_AFTER_SECS);
    }

    #[tokio::test]
    async fn test_generate_image_sends_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer hf-key"))
            .and(body_json(serde_json::json!({ "inputs": "a cozy loft" })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
            .expect(1)
            .mount(&server)
            .await;

        let http = Client::new();
        let url = server.uri();
        let hf = HuggingFaceClient::new(&http, &url, "hf-key", Duration::from_secs(5));

        let image = hf.generate_image("a cozy loft").await.unwrap();
        assert_eq!(&image[..], &[0x89, 0x50, 0x4e, 0x47]);
    }

    #[tokio::test]
    async fn test_model_loading_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(serde_json::json!({ "error": "loading", "estimated_time": 12.0 })),
            )
            .mount(&server)
            .await;

        let http = Client::new();
        let url = server.uri();
        let hf = HuggingFaceClient::new(&http, &url, "hf-key", Duration::from_secs(5));

        match hf.generate_image("x").await {
            Err(BackendError::UpstreamTransient { retry_after_secs }) => {
                assert_eq!(retry_after_secs, 12)
            }
            other => panic!("Expected UpstreamTransient, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_failures_are_generation_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad prompt"))
            .mount(&server)
            .await;

        let http = Client::new();
        let url = server.uri();
        let hf = HuggingFaceClient::new(&http, &url, "hf-key", Duration::from_secs(5));

        assert!(matches!(
            hf.generate_image("x").await,
            Err(BackendError::Generation(_))
        ));
    }
}
