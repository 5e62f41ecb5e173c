//! promptbench CLI
//!
//! Experimentation client for OpenAI-compatible text completion endpoints.

use anyhow::Result;
use clap::Parser;
use promptbench::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
