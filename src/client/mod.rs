//! Transport boundary for the completion endpoint
//!
//! The [`CompletionBackend`] trait is the seam the batch runner dispatches
//! through; [`HttpBackend`] is the real implementation, and tests substitute
//! mock backends.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{ClientConfig, GenerationOverrides};
use crate::error::Result;

/// A text completion request in the `/v1/completions` wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip)]
    extra: Map<String, Value>,
}

impl CompletionRequest {
    /// Build a request from config defaults with overrides applied
    /// key-by-key, overrides winning.
    pub fn new(config: &ClientConfig, prompt: &str, overrides: &GenerationOverrides) -> Self {
        Self {
            model: config.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: overrides.max_tokens.unwrap_or(config.max_tokens),
            temperature: overrides.temperature.unwrap_or(config.temperature),
            extra: overrides.extra.clone(),
        }
    }

    /// JSON body with the extra override entries merged over the base
    /// fields. An extra entry sharing a name with a base field replaces it.
    pub fn body(&self) -> Value {
        let mut body = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // Serialization of a plain struct cannot fail or yield a
            // non-object; fall back to an empty body rather than panic.
            _ => Map::new(),
        };
        for (key, value) in &self.extra {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }
}

/// A completion response; only the fields this client reads.
///
/// An empty `choices` array is a valid success, not a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
}

impl CompletionResponse {
    /// Trimmed text of the first choice, or `None` when the server returned
    /// no choices.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.trim())
    }
}

/// Transport trait every completion backend implements.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one completion request. Errors here are transport-level; the
    /// batch runner converts them into failed results.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
