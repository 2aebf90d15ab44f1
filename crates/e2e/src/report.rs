//! Suite results and failure artifacts
//!
//! Every case run leaves a final-state screenshot behind; the reporter
//! keeps it (named by case and timestamp) when the case failed and removes
//! it when the case passed. Suite results serialize to JSON under the
//! output directory.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::E2eResult;
use crate::model::Outcome;

/// Result of running a single test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: String,
    pub expected: Outcome,
    pub passed: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

/// Result of running the whole suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Fixture rows dropped before execution.
    pub skipped_rows: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

/// Captures a visual artifact for every failing case.
pub struct FailureReporter {
    screenshot_dir: PathBuf,
}

impl FailureReporter {
    pub fn new(output_dir: &Path) -> E2eResult<Self> {
        let screenshot_dir = output_dir.join("screenshots");
        std::fs::create_dir_all(&screenshot_dir)?;
        Ok(Self { screenshot_dir })
    }

    /// Where this case's final-state screenshot goes, keyed by case id and
    /// capture timestamp.
    pub fn artifact_path(&self, case_id: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        self.screenshot_dir
            .join(format!("{}_{timestamp}.png", sanitize(case_id)))
    }

    /// The case failed: keep the artifact and point at it in the log.
    pub fn keep(&self, case_id: &str, path: &Path) {
        if path.exists() {
            info!("Screenshot for failed case '{case_id}': {}", path.display());
        } else {
            warn!("No screenshot was captured for failed case '{case_id}'");
        }
    }

    /// The case passed: the artifact is noise, drop it.
    pub fn discard(&self, path: &Path) {
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Write suite results as pretty JSON and return the path.
pub fn write_results(output_dir: &Path, results: &SuiteResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_is_keyed_by_case_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = FailureReporter::new(dir.path()).unwrap();

        let path = reporter.artifact_path("TC-001");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("TC-001_"));
        assert!(name.ends_with(".png"));
        // yyyyMMdd_HHmmss
        assert_eq!(name.len(), "TC-001_".len() + 15 + ".png".len());
        assert!(path.starts_with(dir.path().join("screenshots")));
    }

    #[test]
    fn test_artifact_names_are_filesystem_safe() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = FailureReporter::new(dir.path()).unwrap();

        let path = reporter.artifact_path("invalid email #3");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("invalid-email--3_"));
    }

    #[test]
    fn test_discard_removes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = FailureReporter::new(dir.path()).unwrap();

        let path = reporter.artifact_path("TC-GONE");
        std::fs::write(&path, b"png").unwrap();
        reporter.discard(&path);
        assert!(!path.exists());
    }

    #[test]
    fn test_write_results_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let suite = SuiteResult {
            total: 2,
            passed: 1,
            failed: 1,
            skipped_rows: 0,
            duration_ms: 1234,
            results: vec![CaseResult {
                case_id: "TC-001".into(),
                expected: Outcome::Success,
                passed: true,
                duration_ms: 600,
                error: None,
                screenshot: None,
            }],
        };

        let path = write_results(dir.path(), &suite).unwrap();
        let parsed: SuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.results[0].expected, Outcome::Success);
    }
}
