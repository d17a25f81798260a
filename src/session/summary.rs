//! End-of-session summary and its JSON record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{SessionId, Termination};
use crate::error::{Result, SettleError};
use crate::journal::Journal;
use crate::steps::{Step, StepReport, StepStatus};

/// Path of the summary record for a session: `<dir>/<prefix>-<id>.json`.
pub fn summary_file_path(dir: &Path, prefix: &str, session: &SessionId) -> PathBuf {
    dir.join(format!("{}-{}.json", prefix, session))
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub label: String,
    pub status: StepStatus,

    /// Options picked in a selection loop, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selections: Vec<String>,

    /// Failed best-effort actions as `<action>: <message>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl StepRecord {
    pub fn declined(step: &Step) -> Self {
        Self {
            name: step.name().to_string(),
            label: step.label().to_string(),
            status: StepStatus::Declined,
            selections: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_report(step: &Step, report: &StepReport) -> Self {
        Self {
            name: step.name().to_string(),
            label: step.label().to_string(),
            status: report.status,
            selections: Vec::new(),
            warnings: warnings_of(report),
        }
    }

    /// Record for a selection loop given the reports of its iterations.
    ///
    /// A loop that ran at least once counts as accepted.
    pub fn from_selections(step: &Step, picks: &[(String, StepReport)]) -> Self {
        let warnings: Vec<String> = picks
            .iter()
            .flat_map(|(_, report)| warnings_of(report))
            .collect();
        let status = if picks.is_empty() {
            StepStatus::Declined
        } else if warnings.is_empty() {
            StepStatus::Completed
        } else {
            StepStatus::CompletedWithWarnings
        };

        Self {
            name: step.name().to_string(),
            label: step.label().to_string(),
            status,
            selections: picks.iter().map(|(label, _)| label.clone()).collect(),
            warnings,
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self.status, StepStatus::Declined | StepStatus::Failed)
    }
}

fn warnings_of(report: &StepReport) -> Vec<String> {
    report
        .failures()
        .map(|(action, message)| format!("{}: {}", action, message))
        .collect()
}

/// Session summary, written to the journal and as a JSON record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub dry_run: bool,
    pub termination: Termination,
    pub log_file: PathBuf,
    pub steps: Vec<StepRecord>,
}

impl SessionSummary {
    pub fn accepted(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.is_accepted())
    }

    pub fn declined(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Declined)
    }

    pub fn warned(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| !s.warnings.is_empty())
    }

    /// Report lines, in the order they are logged.
    pub fn lines(&self) -> Vec<String> {
        let join = |records: Vec<&StepRecord>| {
            if records.is_empty() {
                "none".to_string()
            } else {
                records
                    .iter()
                    .map(|r| r.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };

        let mut lines = vec![
            format!("Accepted steps: {}", join(self.accepted().collect())),
            format!("Declined steps: {}", join(self.declined().collect())),
            format!("Steps with warnings: {}", join(self.warned().collect())),
        ];
        for record in self.steps.iter().filter(|r| !r.selections.is_empty()) {
            lines.push(format!(
                "{} selections: {}",
                record.label,
                record.selections.join(", ")
            ));
        }
        for record in self.warned() {
            for warning in &record.warnings {
                lines.push(format!("  {}: {}", record.label, warning));
            }
        }
        lines
    }

    /// Log the report.
    pub fn log(&self, journal: &mut Journal<'_>) -> Result<()> {
        journal.ui().show_header("Summary");
        for line in self.lines() {
            journal.info(line)?;
        }
        Ok(())
    }

    /// Write the JSON record.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SettleError::Other(e.into()))?;
        fs::write(path, json)?;
        Ok(())
    }
}
