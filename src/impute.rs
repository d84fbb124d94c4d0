//! Group-mean estimation of missing coordinates.
//!
//! Scraped pages often omit latitude and longitude while still naming a
//! trailhead shared with other entities. Missing cells of the target numeric
//! columns are filled with the mean of the non-missing values in the same
//! group, and a provenance column records which rows were estimated.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    frame::{Column, FrameError, Table},
    report::{Action, RunReport, Stage},
    schema::ColumnType,
};

pub const ACTUAL_LABEL: &str = "Actual";

#[derive(Debug, Error)]
pub enum ImputeError {
    #[error("imputation column '{0}' not found")]
    UnknownColumn(String),
    #[error("column '{column}' must be numeric to be imputed (found {found})")]
    NotNumeric { column: String, found: ColumnType },
    #[error("provenance column '{0}' already exists")]
    ProvenanceExists(String),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImputeConfig {
    pub enabled: bool,
    /// Column whose values define the groups means are taken over.
    pub group_by: String,
    /// Numeric columns whose missing cells are filled.
    pub columns: Vec<String>,
    pub provenance_column: String,
}

impl Default for ImputeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            group_by: "Trailhead".to_string(),
            columns: vec!["Lat".to_string(), "Long".to_string()],
            provenance_column: "Coord_Type".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImputeSummary {
    pub column: String,
    pub missing_before: usize,
    pub missing_after: usize,
}

fn group_means<'a>(
    groups: &'a [Option<String>],
    cells: &[Option<f64>],
) -> HashMap<&'a str, f64> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for (group, cell) in groups.iter().zip(cells) {
        if let (Some(group), Some(value)) = (group.as_deref(), cell) {
            let entry = totals.entry(group).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(group, (sum, count))| (group, sum / count as f64))
        .collect()
}

/// Fills missing cells of each target column with its group mean and appends
/// the provenance column. Rows whose group key is missing, or whose group has
/// no known value, stay missing and get no provenance label.
pub fn impute_group_means(
    table: &mut Table,
    config: &ImputeConfig,
    report: &mut RunReport,
) -> Result<Vec<ImputeSummary>, ImputeError> {
    let group_column = table
        .column(&config.group_by)
        .ok_or_else(|| ImputeError::UnknownColumn(config.group_by.clone()))?;
    let groups = (0..table.row_count())
        .map(|row| group_column.value(row).map(|value| value.to_string()))
        .collect::<Vec<_>>();
    if table.has_column(&config.provenance_column) {
        return Err(ImputeError::ProvenanceExists(
            config.provenance_column.clone(),
        ));
    }
    for name in &config.columns {
        let column = table
            .column(name)
            .ok_or_else(|| ImputeError::UnknownColumn(name.clone()))?;
        if column.as_numeric().is_none() {
            return Err(ImputeError::NotNumeric {
                column: name.clone(),
                found: column.column_type(),
            });
        }
    }

    let rows = groups.len();
    let mut had_missing = vec![false; rows];
    let mut estimated = vec![false; rows];
    let mut summaries = Vec::with_capacity(config.columns.len());

    for name in &config.columns {
        let cells = table
            .column_mut(name)
            .and_then(Column::as_numeric_mut)
            .ok_or_else(|| ImputeError::UnknownColumn(name.clone()))?;
        let means = group_means(&groups, cells.as_slice());
        let missing_before = cells.iter().filter(|cell| cell.is_none()).count();

        for (row, cell) in cells.iter_mut().enumerate() {
            if cell.is_some() {
                continue;
            }
            had_missing[row] = true;
            if let Some(&mean) = groups[row].as_deref().and_then(|group| means.get(group)) {
                *cell = Some(mean);
                estimated[row] = true;
            }
        }

        let missing_after = cells.iter().filter(|cell| cell.is_none()).count();
        info!("Missing values in '{name}' reduced from {missing_before} to {missing_after}");
        report.record(
            Stage::Impute,
            Some(name.as_str()),
            Action::Imputed,
            format!(
                "missing values reduced from {missing_before} to {missing_after} using the mean by '{}'",
                config.group_by
            ),
        );
        summaries.push(ImputeSummary {
            column: name.clone(),
            missing_before,
            missing_after,
        });
    }

    let estimate_label = format!("Est - {}", config.group_by);
    let provenance = had_missing
        .iter()
        .zip(&estimated)
        .map(|(&missing, &filled)| match (missing, filled) {
            (false, _) => Some(ACTUAL_LABEL.to_string()),
            (true, true) => Some(estimate_label.clone()),
            (true, false) => None,
        })
        .collect();
    table.push_column(Column::categorical(
        config.provenance_column.clone(),
        provenance,
    ))?;
    Ok(summaries)
}
