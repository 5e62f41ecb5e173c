//! Batch dispatch engine
//!
//! Takes an ordered list of prompts and a concurrency bound, issues one
//! completion request per prompt, and collects one [`RequestResult`] per
//! prompt into a [`ResultSet`]. Individual failures become failed results;
//! the batch always runs to completion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{Mutex, Semaphore};

use crate::client::{CompletionBackend, CompletionRequest};
use crate::config::{ClientConfig, GenerationOverrides};
use crate::metrics::{RequestResult, ResultSet};

/// Dispatches a batch of prompts through a completion backend.
pub struct BatchRunner<B> {
    backend: Arc<B>,
    config: ClientConfig,
}

impl<B: CompletionBackend + 'static> BatchRunner<B> {
    pub fn new(backend: B, config: ClientConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute one prompt and convert the outcome into a [`RequestResult`].
    /// Never fails: every transport error becomes a failed result.
    pub async fn execute_one(
        &self,
        prompt: &str,
        overrides: &GenerationOverrides,
    ) -> RequestResult {
        execute(self.backend.as_ref(), &self.config, prompt, overrides).await
    }

    /// Run the whole batch under the given concurrency bound.
    ///
    /// Always returns exactly `prompts.len()` results. At `concurrency == 1`
    /// prompts are processed strictly in input order with no pool overhead;
    /// above that, results land in completion order. Order is the only
    /// divergence between the two paths.
    pub async fn run(
        &self,
        prompts: &[String],
        concurrency: usize,
        overrides: &GenerationOverrides,
    ) -> ResultSet {
        if concurrency <= 1 {
            self.run_sequential(prompts, overrides).await
        } else {
            self.run_concurrent(prompts, concurrency, overrides).await
        }
    }

    async fn run_sequential(
        &self,
        prompts: &[String],
        overrides: &GenerationOverrides,
    ) -> ResultSet {
        let total = prompts.len();
        let pb = progress_bar(total);
        let mut results = ResultSet::new();

        for (i, prompt) in prompts.iter().enumerate() {
            tracing::info!("Processing {}/{}: {}...", i + 1, total, preview(prompt));
            let result = self.execute_one(prompt, overrides).await;
            results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Batch complete");
        results
    }

    async fn run_concurrent(
        &self,
        prompts: &[String],
        concurrency: usize,
        overrides: &GenerationOverrides,
    ) -> ResultSet {
        let total = prompts.len();
        let pb = progress_bar(total);
        let results = Arc::new(Mutex::new(ResultSet::new()));
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::with_capacity(total);

        for prompt in prompts {
            let backend = self.backend.clone();
            let config = self.config.clone();
            let overrides = overrides.clone();
            let prompt = prompt.clone();
            let results = results.clone();
            let semaphore = semaphore.clone();
            let completed = completed.clone();
            let pb = pb.clone();

            let task = tokio::spawn(async move {
                // At most `concurrency` requests in flight at any instant
                let _permit = semaphore.acquire().await.unwrap();

                let result = execute(backend.as_ref(), &config, &prompt, &overrides).await;

                // Lock held only for the append, never across the network
                // call above
                results.lock().await.push(result);

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::info!("Completed {}/{}", done, total);
                pb.inc(1);
            });

            tasks.push(task);
        }

        for task in tasks {
            let _ = task.await;
        }

        pb.finish_with_message("Batch complete");

        let results = std::mem::take(&mut *results.lock().await);
        results
    }
}

/// Issue one completion call, measuring wall-clock latency around the
/// network call only.
async fn execute<B: CompletionBackend>(
    backend: &B,
    config: &ClientConfig,
    prompt: &str,
    overrides: &GenerationOverrides,
) -> RequestResult {
    let request = CompletionRequest::new(config, prompt, overrides);

    let start = Instant::now();
    let outcome = backend.complete(&request).await;
    let latency = start.elapsed().as_secs_f64();

    match outcome {
        Ok(response) => {
            // Zero choices is a documented success with empty output
            let text = response.first_text().unwrap_or_default().to_string();
            RequestResult::success(prompt.to_string(), text, latency)
        }
        Err(e) => RequestResult::failure(prompt.to_string(), latency, e.to_string()),
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn preview(prompt: &str) -> String {
    prompt.chars().take(50).collect()
}
