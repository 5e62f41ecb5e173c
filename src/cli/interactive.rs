//! Interactive REPL mode

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::HttpBackend;
use crate::config::GenerationOverrides;
use crate::runner::BatchRunner;

/// Read prompts from stdin until the user quits.
pub async fn run(runner: &BatchRunner<HttpBackend>, backend: &HttpBackend) -> Result<()> {
    println!("🚀 Interactive Mode");
    println!("Type 'quit' to exit, 'help' for commands");
    println!("{}", "-".repeat(40));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\n💬 Prompt: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" | "q" => {
                println!("👋 Goodbye!");
                break;
            }
            "help" => {
                println!(
                    "\nAvailable commands:\n\
                     - quit/exit/q: Exit interactive mode\n\
                     - help: Show this help\n\
                     - config: Show current configuration\n\
                     - models: List available models"
                );
                continue;
            }
            "config" => {
                let config = runner.config();
                println!("\nCurrent Configuration:");
                println!("  Server: {}", config.base_url);
                println!("  Model: {}", config.model);
                println!("  Max Tokens: {}", config.max_tokens);
                println!("  Temperature: {}", config.temperature);
                println!("  Timeout: {}s", config.timeout.as_secs());
                continue;
            }
            "models" => {
                match backend.list_models().await {
                    Ok(models) => {
                        println!("Available models:");
                        for model in models {
                            println!("  - {model}");
                        }
                    }
                    Err(e) => println!("Could not fetch models: {e}"),
                }
                continue;
            }
            _ => {}
        }

        println!("🤔 Generating...");
        let result = runner
            .execute_one(input, &GenerationOverrides::default())
            .await;

        match &result.error {
            Some(error) => println!("❌ Error: {error}"),
            None => {
                println!("🤖 Response: {}", result.response);
                println!("⏱️  Latency: {:.2}s", result.latency);
                println!("🔤 Tokens: {}", result.tokens_generated);
            }
        }
    }

    Ok(())
}
