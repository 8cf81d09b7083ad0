/*!
 * Build report for one translation run.
 *
 * Records which documents were fully translated and which fell back to a
 * verbatim copy, with the reason. Written once per run as pretty JSON so the
 * result of a large batch can be audited after the fact.
 */

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// File name of the report inside the output directory
pub const REPORT_FILE_NAME: &str = "ai-build-report.json";

/// One failed document and why it failed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedDocument {
    /// Source document path
    pub file: PathBuf,

    /// Human-readable failure reason
    pub reason: String,
}

/// Outcome summary of a full run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    /// Documents translated and restored successfully
    pub success: Vec<PathBuf>,

    /// Documents that failed and fell back (or were skipped)
    pub failed: Vec<FailedDocument>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed document
    pub fn record_success(&mut self, file: impl Into<PathBuf>) {
        self.success.push(file.into());
    }

    /// Record a failed document with its reason
    pub fn record_failure(&mut self, file: impl Into<PathBuf>, reason: impl Into<String>) {
        self.failed.push(FailedDocument {
            file: file.into(),
            reason: reason.into(),
        });
    }

    /// Total number of documents accounted for
    pub fn total(&self) -> usize {
        self.success.len() + self.failed.len()
    }

    /// Merge another report into this one (used when pipelines run
    /// concurrently and each returns its own outcome)
    pub fn merge(&mut self, other: BuildReport) {
        self.success.extend(other.success);
        self.failed.extend(other.failed);
    }

    /// Write the report to `<output_dir>/ai-build-report.json`
    pub fn write_to_dir<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf> {
        let report_path = output_dir.as_ref().join(REPORT_FILE_NAME);
        let serialized =
            serde_json::to_string_pretty(self).context("Failed to serialize build report")?;
        FileManager::write_to_file(&report_path, &serialized)?;
        Ok(report_path)
    }
}
