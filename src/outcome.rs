use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::decompression::Compression;
use crate::error::TrimError;
use crate::transform::TransformStats;

/// Why a file was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    OutputExists,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::OutputExists => write!(f, "output exists"),
        }
    }
}

/// Which step of a file task failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    SourceOpen,
    DestinationOpen,
    Stream,
}

impl FailureReason {
    pub fn from_error(error: &TrimError) -> Self {
        match error {
            TrimError::SourceOpen { .. } => FailureReason::SourceOpen,
            TrimError::DestinationOpen { .. } => FailureReason::DestinationOpen,
            _ => FailureReason::Stream,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::SourceOpen => write!(f, "source open failed"),
            FailureReason::DestinationOpen => write!(f, "destination open failed"),
            FailureReason::Stream => write!(f, "stream error during transform"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum OutcomeKind {
    Processed,
    Skipped(SkipReason),
    Failed(FailureReason),
}

/// Terminal result for one discovered input file
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub kind: OutcomeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TransformStats>,
}

impl Outcome {
    pub fn processed(path: &Path, compression: Compression, stats: TransformStats) -> Self {
        let mut message = format!(
            "Processed ({}): {} records",
            compression,
            stats.records
        );
        if stats.is_truncated() {
            message.push_str(&format!(", last record truncated at line {}", stats.lines));
        }
        Self {
            path: path.to_path_buf(),
            kind: OutcomeKind::Processed,
            message,
            compression: Some(compression),
            stats: Some(stats),
        }
    }

    pub fn skipped(path: &Path, reason: SkipReason) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: OutcomeKind::Skipped(reason),
            message: format!("Skipped: {}", reason),
            compression: None,
            stats: None,
        }
    }

    pub fn failed(path: &Path, error: &TrimError) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: OutcomeKind::Failed(FailureReason::from_error(error)),
            message: error.to_string(),
            compression: None,
            stats: None,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Processed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failed(_))
    }

    /// File name for log and progress lines
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Counts and per-file outcomes for one batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub records: u64,
    pub bases_removed: u64,
    pub worker_budget: usize,
    /// Highest number of files seen in flight at once
    pub peak_workers: usize,
    pub elapsed_ms: u64,
    pub outcomes: Vec<Outcome>,
}

impl RunSummary {
    pub fn new(worker_budget: usize) -> Self {
        Self {
            worker_budget,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome.kind {
            OutcomeKind::Processed => self.processed += 1,
            OutcomeKind::Skipped(_) => self.skipped += 1,
            OutcomeKind::Failed(_) => self.failed += 1,
        }
        if let Some(stats) = outcome.stats {
            self.records += stats.records;
            self.bases_removed += stats.bases_removed;
        }
        self.outcomes.push(outcome);
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis() as u64;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Outcome for a given input file name, if it was discovered
    pub fn outcome_for(&self, file_name: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.file_name() == file_name)
    }

    pub fn format_table(&self) -> String {
        let mut output = format!(
            "Files: {} total, {} processed, {} skipped, {} failed",
            self.total, self.processed, self.skipped, self.failed
        );

        if self.records > 0 {
            output.push_str(&format!(
                "; {} records, {} bases removed",
                self.records, self.bases_removed
            ));
        }

        output.push_str(&format!(" in {}ms", self.elapsed_ms));

        if self.elapsed_ms > 0 && self.records > 0 {
            let records_per_sec = (self.records as f64 * 1000.0) / self.elapsed_ms as f64;
            output.push_str(&format!(" ({:.0} records/s)", records_per_sec));
        }

        output.push_str(&format!(
            ", {} workers (peak {})",
            self.worker_budget, self.peak_workers
        ));

        output
    }
}
