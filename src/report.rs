//! Per-item results and batch reports.
//!
//! Every unit of work (one download, one extraction, one ogr2ogr call)
//! produces an [`ItemOutcome`]. A [`BatchReport`] collects them in order and
//! decides, together with a [`FailurePolicy`], whether the batch continues.

use crate::error::{GisError, Result};
use crate::utils::human_bytes;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// What to do when an item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failed item
    #[default]
    Abort,
    /// Record the failure and continue with the next item
    Continue,
}

impl FailurePolicy {
    pub fn from_keep_going(keep_going: bool) -> Self {
        if keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }
}

/// Result of a single unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        bytes: Option<u64>,
    },
    Failed {
        error: String,
    },
    Skipped {
        reason: String,
    },
}

/// One entry in a batch report.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    /// What was processed (theme, geodatabase, layer, file)
    pub item: String,
    /// Which step produced the outcome (download, extract, convert, merge)
    pub step: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

impl ItemReport {
    pub fn success(item: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            step: step.into(),
            outcome: ItemOutcome::Success { bytes: None },
        }
    }

    pub fn success_with_bytes(item: impl Into<String>, step: impl Into<String>, bytes: u64) -> Self {
        Self {
            item: item.into(),
            step: step.into(),
            outcome: ItemOutcome::Success { bytes: Some(bytes) },
        }
    }

    pub fn failed(item: impl Into<String>, step: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            step: step.into(),
            outcome: ItemOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn skipped(item: impl Into<String>, step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            step: step.into(),
            outcome: ItemOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Success { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Skipped { .. })
    }
}

/// Ordered results of one program run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub program: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub items: Vec<ItemReport>,
    /// Set when the batch stopped early because of the failure policy
    pub aborted: bool,
}

impl BatchReport {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            started_at: Utc::now(),
            finished_at: None,
            items: Vec::new(),
            aborted: false,
        }
    }

    /// Record an item and report whether the batch should keep going.
    pub fn record(&mut self, item: ItemReport, policy: FailurePolicy) -> bool {
        let failed = item.is_failed();
        self.items.push(item);
        if failed && policy == FailurePolicy::Abort {
            self.aborted = true;
            false
        } else {
            true
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_skipped()).count()
    }

    pub fn total_bytes(&self) -> u64 {
        self.items
            .iter()
            .filter_map(|i| match i.outcome {
                ItemOutcome::Success { bytes } => bytes,
                _ => None,
            })
            .sum()
    }

    /// Print failed and skipped items followed by the totals line.
    pub fn print_summary(&self) {
        println!("\n--- {} summary ---", self.program);
        for item in &self.items {
            match &item.outcome {
                ItemOutcome::Success { bytes: Some(b) } => {
                    println!("  {} {}: {} ({})", item.step, item.item, "OK".green(), human_bytes(*b));
                }
                ItemOutcome::Success { bytes: None } => {
                    println!("  {} {}: {}", item.step, item.item, "OK".green());
                }
                ItemOutcome::Failed { error } => {
                    println!("  {} {}: {} - {}", item.step, item.item, "FAILED".red(), error);
                }
                ItemOutcome::Skipped { reason } => {
                    println!("  {} {}: {} - {}", item.step, item.item, "SKIPPED".yellow(), reason);
                }
            }
        }

        println!("---");
        println!("{}", self.totals_line());
        if self.aborted {
            println!("{}", "Stopped after the first failure (use --keep-going to continue past failures)".yellow());
        }
    }

    /// Counts, transferred bytes (when any) and elapsed time.
    fn totals_line(&self) -> String {
        let transferred = match self.total_bytes() {
            0 => String::new(),
            bytes => format!(", {} transferred", human_bytes(bytes)),
        };

        let elapsed = self
            .finished_at
            .and_then(|end| (end - self.started_at).to_std().ok())
            .map(|d| humantime::format_duration(std::time::Duration::from_secs(d.as_secs())))
            .map(|d| format!(" in {}", d))
            .unwrap_or_default();

        format!(
            "{} success, {} failed, {} skipped{}{}",
            self.success_count(),
            self.failed_count(),
            self.skipped_count(),
            transferred,
            elapsed
        )
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Turn the batch into a process-level result.
    pub fn into_result(self) -> Result<()> {
        let failed = self.failed_count();
        if failed > 0 {
            Err(GisError::BatchFailed {
                failed,
                total: self.items.len(),
            })
        } else {
            Ok(())
        }
    }
}
