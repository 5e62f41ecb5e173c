//! CLI argument parsing and command handling

mod interactive;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use crate::client::HttpBackend;
use crate::config::{ClientConfig, GenerationOverrides};
use crate::metrics::ResultSet;
use crate::output::save_results;
use crate::prompts::{expand_repeats, load_prompts};
use crate::runner::BatchRunner;

/// Experimentation client for OpenAI-compatible completion endpoints
#[derive(Parser, Debug)]
#[command(name = "promptbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server base URL
    #[arg(long, env = "PROMPTBENCH_SERVER", default_value = "http://localhost:8000")]
    pub server: String,

    /// Model name
    #[arg(long, default_value = "meta-llama/Meta-Llama-3-8B")]
    pub model: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Maximum tokens to generate
    #[arg(long, default_value = "100")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value = "0.7")]
    pub temperature: f32,

    /// Single prompt to process
    #[arg(long)]
    pub prompt: Option<String>,

    /// File containing prompts (.txt or .json)
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// Start interactive mode
    #[arg(long)]
    pub interactive: bool,

    /// Number of concurrent requests
    #[arg(long, default_value = "1")]
    pub concurrent: usize,

    /// Repeat the prompt list N times
    #[arg(long, default_value = "1")]
    pub repeat: usize,

    /// Output file for results (.json or .csv)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Check server health and exit
    #[arg(long)]
    pub check: bool,

    /// List available models and exit
    #[arg(long)]
    pub models: bool,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Run the selected mode.
    pub async fn run(&self) -> Result<()> {
        let config = self.client_config();
        let backend = HttpBackend::new(&config)?;

        if self.check {
            if backend.health_check().await {
                println!("✅ Server is healthy");
                return Ok(());
            }
            anyhow::bail!("server is not responding");
        }

        if self.models {
            let models = backend
                .list_models()
                .await
                .context("could not fetch models")?;
            println!("Available models:");
            for model in models {
                println!("  - {model}");
            }
            return Ok(());
        }

        println!("🔗 Connecting to: {}", config.base_url);
        println!("🤖 Model: {}", config.model);

        if !backend.health_check().await {
            tracing::warn!("Server health check failed. Proceeding anyway...");
        }

        let runner = BatchRunner::new(backend.clone(), config);

        if self.interactive {
            return interactive::run(&runner, &backend).await;
        }

        if let Some(prompt) = &self.prompt {
            let prompts = expand_repeats(std::slice::from_ref(prompt), self.repeat);
            let results = self.run_batch(&runner, &prompts).await;

            self.print_summary(&results);

            if let Some(output) = &self.output {
                save_results(&results, output)?;
                println!("💾 Results saved to: {}", output.display());
            }
            return Ok(());
        }

        if let Some(path) = &self.prompt_file {
            let base_prompts = load_prompts(path)?;
            let prompts = expand_repeats(&base_prompts, self.repeat);

            println!(
                "📄 Loaded {} prompts from {}",
                base_prompts.len(),
                path.display()
            );
            if self.repeat > 1 {
                println!("🔄 Each prompt will be repeated {} times", self.repeat);
            }
            println!("📊 Total requests: {}", prompts.len());

            let results = self.run_batch(&runner, &prompts).await;

            self.print_summary(&results);

            let output = self.output.clone().unwrap_or_else(default_output_path);
            save_results(&results, &output)?;
            println!("💾 Results saved to: {}", output.display());
            return Ok(());
        }

        // No prompt source given: fall back to interactive mode
        interactive::run(&runner, &backend).await
    }

    async fn run_batch(&self, runner: &BatchRunner<HttpBackend>, prompts: &[String]) -> ResultSet {
        runner
            .run(prompts, self.concurrent, &GenerationOverrides::default())
            .await
    }

    /// Print the experiment summary.
    fn print_summary(&self, results: &ResultSet) {
        if results.is_empty() {
            println!("No results to summarize");
            return;
        }

        let stats = results.summarize();

        println!();
        println!("{}", "=".repeat(50));
        println!("📊 EXPERIMENT SUMMARY");
        println!("{}", "=".repeat(50));
        println!("Total requests: {}", stats.total);
        println!("Successful: {}", stats.succeeded);
        println!("Failed: {}", stats.failed);

        if let Some(success) = &stats.success {
            println!();
            println!("⏱️  Latency:");
            println!("  Average: {:.2}s", success.avg_latency);
            println!("  Min: {:.2}s", success.min_latency);
            println!("  Max: {:.2}s", success.max_latency);

            println!();
            println!("🔤 Tokens:");
            println!("  Average per request: {:.1}", success.avg_tokens);
            println!("  Total generated: {}", success.total_tokens);

            println!();
            println!("🚀 Performance:");
            println!("  Requests per second: {:.2}", success.requests_per_second);
            println!("  Tokens per second: {:.1}", success.tokens_per_second);
        }

        if !stats.errors.is_empty() {
            println!();
            println!("❌ Errors:");
            for (error, count) in &stats.errors {
                println!("  {error}: {count}");
            }
        }
    }
}

fn default_output_path() -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("results_{timestamp}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["promptbench"]);
        assert_eq!(cli.server, "http://localhost:8000");
        assert_eq!(cli.concurrent, 1);
        assert_eq!(cli.repeat, 1);
        assert!(!cli.check);
    }

    #[test]
    fn test_cli_config_mapping() {
        let cli = Cli::parse_from([
            "promptbench",
            "--server",
            "http://10.0.0.1:9000",
            "--max-tokens",
            "256",
            "--timeout",
            "5",
        ]);
        let config = cli.client_config();
        assert_eq!(config.base_url, "http://10.0.0.1:9000");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_output_path_is_json() {
        let path = default_output_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }
}
