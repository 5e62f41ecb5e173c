//! Prompt file loading
//!
//! Supports plain text files (one prompt per line) and JSON files holding
//! either a top-level array of strings or `{"prompts": [...]}`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Load prompts from a `.txt` or `.json` file.
pub fn load_prompts(path: &Path) -> Result<Vec<String>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read prompt file: {}", path.display()))?;

    match extension.as_deref() {
        Some("json") => parse_json_prompts(&content)
            .with_context(|| format!("failed to parse prompt file: {}", path.display())),
        Some("txt") => Ok(content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect()),
        _ => anyhow::bail!("supported prompt file formats: .json, .txt"),
    }
}

fn parse_json_prompts(content: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(content).context("invalid JSON")?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("prompts") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!(
                "JSON file should contain a list or {{\"prompts\": [...]}} structure"
            ),
        },
        _ => anyhow::bail!("JSON file should contain a list or {{\"prompts\": [...]}} structure"),
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => anyhow::bail!("prompt entries must be strings, got: {other}"),
        })
        .collect()
}

/// Repeat the whole prompt list `repeat` times in sequence:
/// `[a, b]` repeated twice becomes `[a, b, a, b]`.
pub fn expand_repeats(prompts: &[String], repeat: usize) -> Vec<String> {
    let mut expanded = Vec::with_capacity(prompts.len() * repeat);
    for _ in 0..repeat {
        expanded.extend(prompts.iter().cloned());
    }
    expanded
}
