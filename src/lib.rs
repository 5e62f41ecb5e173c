//! promptbench - experimentation client for text completion endpoints
//!
//! Submits prompts to an OpenAI-completions-compatible HTTP server,
//! measures latency and token throughput, and aggregates the results.
//!
//! # Architecture
//!
//! - **Client**: the HTTP transport boundary ([`client::CompletionBackend`])
//! - **Runner**: batch dispatch under a concurrency bound ([`runner::BatchRunner`])
//! - **Metrics**: per-request results and summary statistics
//! - **Prompts**: prompt file loading and repeat expansion
//! - **Output**: JSON/CSV result export
//!
//! # Example
//!
//! ```rust,no_run
//! use promptbench::client::HttpBackend;
//! use promptbench::config::{ClientConfig, GenerationOverrides};
//! use promptbench::runner::BatchRunner;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::default();
//!     let backend = HttpBackend::new(&config)?;
//!     let runner = BatchRunner::new(backend, config);
//!
//!     let prompts = vec!["Hello, world!".to_string()];
//!     let results = runner
//!         .run(&prompts, 4, &GenerationOverrides::default())
//!         .await;
//!
//!     let stats = results.summarize();
//!     println!("{} of {} requests succeeded", stats.succeeded, stats.total);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod prompts;
pub mod runner;

// Re-export commonly used types
pub use client::{CompletionBackend, CompletionRequest, CompletionResponse, HttpBackend};
pub use config::{ClientConfig, GenerationOverrides};
pub use error::ClientError;
pub use metrics::{RequestResult, ResultSet, SummaryStats};
pub use runner::BatchRunner;
