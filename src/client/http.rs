//! HTTP completion backend over reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{CompletionBackend, CompletionRequest, CompletionResponse};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Timeout for the lightweight health probes, independent of the per-request
/// completion timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP backend for an OpenAI-completions-compatible server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

/// Model listing response (`GET /v1/models`)
#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

impl HttpBackend {
    /// Create a backend with the config's base URL and request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/completions", self.base_url)
    }

    /// Probe server liveness.
    ///
    /// Tries `GET /health` first; servers without a health endpoint are
    /// probed through `GET /v1/models` instead.
    pub async fn health_check(&self) -> bool {
        let health = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match health {
            Ok(response) if response.status().is_success() => true,
            _ => {
                let models = self
                    .client
                    .get(format!("{}/v1/models", self.base_url))
                    .timeout(PROBE_TIMEOUT)
                    .send()
                    .await;
                matches!(models, Ok(response) if response.status().is_success())
            }
        }
    }

    /// List the model ids the server advertises.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await
            .map_err(ClientError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let response = self
            .client
            .post(self.completions_url())
            .json(&request.body())
            .send()
            .await
            .map_err(ClientError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.text().await.map_err(ClientError::from)?;
        serde_json::from_str(&body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationOverrides;
    use serde_json::json;

    fn config_for(url: &str) -> ClientConfig {
        ClientConfig {
            base_url: url.to_string(),
            ..Default::default()
        }
    }

    fn request_for(config: &ClientConfig, prompt: &str) -> CompletionRequest {
        CompletionRequest::new(config, prompt, &GenerationOverrides::default())
    }

    #[tokio::test]
    async fn test_complete_parses_choices() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/completions")
            .match_body(mockito::Matcher::PartialJson(json!({
                "prompt": "hello",
                "max_tokens": 100,
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"text":" hi there "}]}"#)
            .create_async()
            .await;

        let config = config_for(&server.url());
        let backend = HttpBackend::new(&config).unwrap();
        let response = backend.complete(&request_for(&config, "hello")).await.unwrap();

        assert_eq!(response.first_text(), Some("hi there"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let config = config_for(&server.url());
        let backend = HttpBackend::new(&config).unwrap();
        let err = backend
            .complete(&request_for(&config, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/completions")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let config = config_for(&server.url());
        let backend = HttpBackend::new(&config).unwrap();
        let err = backend
            .complete(&request_for(&config, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_complete_connection_refused() {
        // Nothing listens on this address
        let config = config_for("http://127.0.0.1:1");
        let backend = HttpBackend::new(&config).unwrap();
        let err = backend
            .complete(&request_for(&config, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"model-a"},{"id":"model-b"}]}"#)
            .create_async()
            .await;

        let config = config_for(&server.url());
        let backend = HttpBackend::new(&config).unwrap();
        let models = backend.list_models().await.unwrap();

        assert_eq!(models, vec!["model-a", "model-b"]);
    }

    #[tokio::test]
    async fn test_health_check_falls_back_to_models() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let config = config_for(&server.url());
        let backend = HttpBackend::new(&config).unwrap();
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let config = config_for("http://127.0.0.1:1");
        let backend = HttpBackend::new(&config).unwrap();
        assert!(!backend.health_check().await);
    }
}
