use std::{fmt, fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pivot,
    Chop,
    Split,
    Dedup,
    Infer,
    Impute,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Pivot => "pivot",
            Stage::Chop => "chop",
            Stage::Split => "split",
            Stage::Dedup => "dedup",
            Stage::Infer => "infer",
            Stage::Impute => "impute",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    DroppedTriple,
    DroppedConflict,
    StripStart,
    StripEnd,
    Split,
    Skipped,
    DuplicateOf,
    DroppedColumn,
    Inferred,
    Imputed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportEntry {
    pub stage: Stage,
    pub column: Option<String>,
    pub action: Action,
    pub detail: String,
}

/// Audit trail of everything a pipeline run changed or skipped.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    entries: Vec<ReportEntry>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn record<D: Into<String>>(
        &mut self,
        stage: Stage,
        column: Option<&str>,
        action: Action,
        detail: D,
    ) {
        self.entries.push(ReportEntry {
            stage,
            column: column.map(str::to_string),
            action,
            detail: detail.into(),
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn for_stage(&self, stage: Stage) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |entry| entry.stage == stage)
    }

    pub fn count(&self, action: Action) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating report file {path:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).context("Writing report JSON")
    }
}
