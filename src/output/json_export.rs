//! JSON export

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::metrics::ResultSet;

pub struct JsonExporter;

impl JsonExporter {
    /// Write the full result array pretty-printed, RFC 3339 timestamps.
    pub fn export(results: &ResultSet, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, results.as_slice())
            .with_context(|| format!("failed to write JSON to: {}", path.display()))?;
        Ok(())
    }
}
