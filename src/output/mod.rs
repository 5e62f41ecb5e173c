//! Result export
//!
//! Output format is chosen by file extension: `.json` or `.csv`.

mod csv_export;
mod json_export;

pub use csv_export::CsvExporter;
pub use json_export::JsonExporter;

use std::path::Path;

use anyhow::Result;

use crate::metrics::ResultSet;

/// Save results to `path`, dispatching on the file extension.
pub fn save_results(results: &ResultSet, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => JsonExporter::export(results, path),
        Some("csv") => CsvExporter::export(results, path),
        _ => anyhow::bail!("supported output formats: .json, .csv"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RequestResult;
    use tempfile::tempdir;

    fn sample_results() -> ResultSet {
        let mut set = ResultSet::new();
        set.push(RequestResult::success(
            "hello".into(),
            "hi there".into(),
            0.42,
        ));
        set.push(RequestResult::failure(
            "world".into(),
            0.1,
            "request timed out".into(),
        ));
        set
    }

    #[test]
    fn test_save_dispatches_on_extension() {
        let dir = tempdir().unwrap();

        let json_path = dir.path().join("results.json");
        save_results(&sample_results(), &json_path).unwrap();
        assert!(json_path.exists());

        let csv_path = dir.path().join("results.csv");
        save_results(&sample_results(), &csv_path).unwrap();
        assert!(csv_path.exists());
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        let err = save_results(&sample_results(), &path).unwrap_err();
        assert!(err.to_string().contains("supported output formats"));
    }
}
