//! CSV export

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::metrics::ResultSet;

pub struct CsvExporter;

impl CsvExporter {
    /// Write one row per result.
    pub fn export(results: &ResultSet, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        let mut wtr = Writer::from_writer(file);

        wtr.write_record([
            "timestamp",
            "prompt",
            "response",
            "latency",
            "tokens_generated",
            "error",
        ])?;

        for result in results.iter() {
            wtr.write_record([
                result.timestamp.to_rfc3339(),
                result.prompt.clone(),
                result.response.clone(),
                result.latency.to_string(),
                result.tokens_generated.to_string(),
                result.error.clone().unwrap_or_default(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RequestResult;
    use tempfile::tempdir;

    #[test]
    fn test_export_rows() {
        let mut set = ResultSet::new();
        set.push(RequestResult::success("hello".into(), "hi there".into(), 0.5));
        set.push(RequestResult::failure("world".into(), 0.1, "request timed out".into()));

        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        CsvExporter::export(&set, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp,prompt,response,latency,tokens_generated,error"
        );
        assert!(lines[1].contains("hello"));
        assert!(lines[1].contains("hi there"));
        assert!(lines[2].contains("request timed out"));
    }
}
