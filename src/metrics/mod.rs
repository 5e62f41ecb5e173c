//! Request results and summary statistics

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable outcome record for one prompt submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestResult {
    /// The exact input text submitted, not normalized
    pub prompt: String,
    /// Generated text, empty when the call failed
    pub response: String,
    /// Wall-clock seconds around the network call, recorded on failure too
    pub latency: f64,
    /// Whitespace-split token count of the trimmed response. Deliberately
    /// coarse (not a tokenizer count); downstream comparisons rely on this
    /// exact definition.
    pub tokens_generated: usize,
    /// Completion time of the attempt
    pub timestamp: DateTime<Utc>,
    /// Failure description; `None` on success
    pub error: Option<String>,
}

impl RequestResult {
    /// Record a successful attempt. Token count is derived from the
    /// response text; an empty response (zero completion choices) is still
    /// a success.
    pub fn success(prompt: String, response: String, latency: f64) -> Self {
        let tokens_generated = response.split_whitespace().count();
        Self {
            prompt,
            response,
            latency,
            tokens_generated,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// Record a failed attempt. Latency is still meaningful: it covers the
    /// time spent on the network call before it failed.
    pub fn failure(prompt: String, latency: f64, error: String) -> Self {
        Self {
            prompt,
            response: String::new(),
            latency,
            tokens_generated: 0,
            timestamp: Utc::now(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Collection of results from one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<RequestResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: RequestResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[RequestResult] {
        &self.results
    }

    /// Compute summary statistics over this snapshot.
    pub fn summarize(&self) -> SummaryStats {
        let total = self.results.len();
        let succeeded = self.results.iter().filter(|r| r.is_success()).count();
        let failed = total - succeeded;

        let success = if succeeded > 0 {
            let latencies: Vec<f64> = self
                .results
                .iter()
                .filter(|r| r.is_success())
                .map(|r| r.latency)
                .collect();
            let total_latency: f64 = latencies.iter().sum();
            let total_tokens: usize = self
                .results
                .iter()
                .filter(|r| r.is_success())
                .map(|r| r.tokens_generated)
                .sum();

            let min_latency = latencies.iter().copied().fold(f64::INFINITY, f64::min);
            let max_latency = latencies.iter().copied().fold(0.0_f64, f64::max);

            // Guard against a zero latency sum so throughput never divides
            // by zero.
            let rate_multiplier = if total_latency > 0.0 {
                1.0 / total_latency
            } else {
                0.0
            };

            Some(SuccessStats {
                avg_latency: total_latency / succeeded as f64,
                min_latency,
                max_latency,
                avg_tokens: total_tokens as f64 / succeeded as f64,
                total_tokens,
                requests_per_second: succeeded as f64 * rate_multiplier,
                tokens_per_second: total_tokens as f64 * rate_multiplier,
            })
        } else {
            None
        };

        let mut errors = BTreeMap::new();
        for result in &self.results {
            if let Some(error) = &result.error {
                *errors.entry(error.clone()).or_insert(0) += 1;
            }
        }

        SummaryStats {
            total,
            succeeded,
            failed,
            success,
            errors,
        }
    }
}

impl From<Vec<RequestResult>> for ResultSet {
    fn from(results: Vec<RequestResult>) -> Self {
        Self { results }
    }
}

impl IntoIterator for ResultSet {
    type Item = RequestResult;
    type IntoIter = std::vec::IntoIter<RequestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

/// Summary statistics over a completed batch.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Latency and throughput figures; `None` when no request succeeded
    /// (reported as unavailable rather than computed)
    pub success: Option<SuccessStats>,
    /// Histogram of literal error messages, exact string equality
    pub errors: BTreeMap<String, usize>,
}

/// Latency and throughput figures over the successful subset.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessStats {
    pub avg_latency: f64,
    pub min_latency: f64,
    pub max_latency: f64,
    pub avg_tokens: f64,
    pub total_tokens: usize,
    /// `succeeded / sum(latencies)`
    pub requests_per_second: f64,
    /// `total_tokens / sum(latencies)`
    pub tokens_per_second: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_counts_whitespace_tokens() {
        let result = RequestResult::success("p".to_string(), "hi there".to_string(), 0.5);
        assert_eq!(result.tokens_generated, 2);
        assert!(result.is_success());
    }

    #[test]
    fn test_empty_response_success() {
        let result = RequestResult::success("p".to_string(), String::new(), 0.1);
        assert!(result.is_success());
        assert_eq!(result.tokens_generated, 0);
        assert!(result.response.is_empty());
    }

    #[test]
    fn test_failure_has_error_and_zero_tokens() {
        let result = RequestResult::failure("p".to_string(), 0.2, "request timed out".to_string());
        assert!(!result.is_success());
        assert_eq!(result.tokens_generated, 0);
        assert!(result.response.is_empty());
        assert!(result.latency >= 0.0);
    }

    #[test]
    fn test_summarize_mixed() {
        let mut set = ResultSet::new();
        set.push(RequestResult::success("a".into(), "one two three".into(), 1.0));
        set.push(RequestResult::success("b".into(), "four".into(), 3.0));
        set.push(RequestResult::failure("c".into(), 0.5, "request timed out".into()));

        let stats = set.summarize();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.succeeded + stats.failed, stats.total);

        let success = stats.success.expect("successes present");
        assert!((success.avg_latency - 2.0).abs() < 1e-9);
        assert!((success.min_latency - 1.0).abs() < 1e-9);
        assert!((success.max_latency - 3.0).abs() < 1e-9);
        assert_eq!(success.total_tokens, 4);
        assert!((success.avg_tokens - 2.0).abs() < 1e-9);
        // 2 successes over 4.0s of summed latency
        assert!((success.requests_per_second - 0.5).abs() < 1e-9);
        assert!((success.tokens_per_second - 1.0).abs() < 1e-9);

        assert_eq!(stats.errors.get("request timed out"), Some(&1));
    }

    #[test]
    fn test_summarize_all_failed_reports_unavailable() {
        let mut set = ResultSet::new();
        set.push(RequestResult::failure("a".into(), 0.1, "request timed out".into()));
        set.push(RequestResult::failure("b".into(), 0.2, "request timed out".into()));

        let stats = set.summarize();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.succeeded, 0);
        assert!(stats.success.is_none());
        assert_eq!(stats.errors.get("request timed out"), Some(&2));
    }

    #[test]
    fn test_summarize_empty() {
        let stats = ResultSet::new().summarize();
        assert_eq!(stats.total, 0);
        assert!(stats.success.is_none());
        assert!(stats.errors.is_empty());
    }

    #[test]
    fn test_summarize_zero_latency_guard() {
        let mut set = ResultSet::new();
        set.push(RequestResult::success("a".into(), "x".into(), 0.0));

        let success = set.summarize().success.expect("successes present");
        assert_eq!(success.requests_per_second, 0.0);
        assert_eq!(success.tokens_per_second, 0.0);
    }

    #[test]
    fn test_error_histogram_groups_identical_messages() {
        let mut set = ResultSet::new();
        set.push(RequestResult::failure("a".into(), 0.1, "request timed out".into()));
        set.push(RequestResult::failure("b".into(), 0.1, "server returned 503: overloaded".into()));
        set.push(RequestResult::failure("c".into(), 0.1, "request timed out".into()));

        let stats = set.summarize();
        assert_eq!(stats.errors.len(), 2);
        assert_eq!(stats.errors.get("request timed out"), Some(&2));
        assert_eq!(stats.errors.get("server returned 503: overloaded"), Some(&1));
    }
}
