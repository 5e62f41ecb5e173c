//! Run configuration and per-call generation overrides

use std::time::Duration;

use serde_json::{Map, Value};

/// Immutable per-run client settings.
///
/// Supplied once at client construction; individual calls override
/// generation parameters through [`GenerationOverrides`] without touching
/// the shared config.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Model identifier sent with every completion request
    pub model: String,
    /// Default maximum tokens to generate
    pub max_tokens: u32,
    /// Default sampling temperature
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            model: "meta-llama/Meta-Llama-3-8B".to_string(),
            max_tokens: 100,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Per-call generation parameter overrides.
///
/// Typed fields take precedence over the matching [`ClientConfig`] defaults;
/// `extra` entries are merged into the request body key-by-key and win over
/// any base field with the same name.
#[derive(Debug, Clone, Default)]
pub struct GenerationOverrides {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Additional body parameters (`top_p`, `stop`, ...), override-precedence
    pub extra: Map<String, Value>,
}

impl GenerationOverrides {
    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none() && self.temperature.is_none() && self.extra.is_empty()
    }
}
