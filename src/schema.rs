//! Column types, late type inference, and the JSON schema sidecar.
//!
//! Inference runs exactly once, after every string-level pass, and decides a
//! type per column from its non-missing values:
//!
//! - only `True`/`False` literals → [`ColumnType::Boolean`]
//! - every value parses as a finite number → [`ColumnType::Numeric`]
//! - few enough distinct values → [`ColumnType::Categorical`]
//! - anything else stays [`ColumnType::Text`]

use std::{collections::HashSet, fmt, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    data::{parse_flag, parse_numeric},
    frame::{ColumnData, FrameError, Table},
    report::{Action, RunReport, Stage},
};

pub const DEFAULT_CATEGORICAL_MAX_UNIQUE: usize = 75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Boolean,
    Numeric,
    Categorical,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceOptions {
    /// Text columns with at most this many distinct values become categorical.
    pub categorical_max_unique: usize,
    /// Missing cells of boolean columns become `false`; flags are scraped only
    /// when present.
    pub fill_missing_flags: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            categorical_max_unique: DEFAULT_CATEGORICAL_MAX_UNIQUE,
            fill_missing_flags: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub data_type: ColumnType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    pub index: String,
    pub columns: Vec<ColumnMeta>,
}

impl Schema {
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|column| ColumnMeta {
                name: column.name.clone(),
                data_type: column.column_type(),
            })
            .collect();
        Schema {
            index: table.index_name().to_string(),
            columns,
        }
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.data_type)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing schema JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        let schema = serde_json::from_reader(reader).context("Parsing schema JSON")?;
        Ok(schema)
    }
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    possible_boolean: bool,
    possible_numeric: bool,
    distinct: usize,
    observed: usize,
}

impl TypeCandidate {
    fn observe(cells: &[Option<String>]) -> Self {
        let mut candidate = Self {
            possible_boolean: true,
            possible_numeric: true,
            distinct: 0,
            observed: 0,
        };
        let mut seen = HashSet::new();
        for value in cells.iter().flatten() {
            candidate.observed += 1;
            if seen.insert(value.as_str()) {
                candidate.distinct += 1;
            }
            if candidate.possible_boolean && parse_flag(value).is_none() {
                candidate.possible_boolean = false;
            }
            if candidate.possible_numeric && parse_numeric(value).is_none() {
                candidate.possible_numeric = false;
            }
        }
        candidate
    }

    fn decide(&self, options: &InferenceOptions) -> ColumnType {
        if self.observed == 0 {
            ColumnType::Text
        } else if self.possible_boolean {
            ColumnType::Boolean
        } else if self.possible_numeric {
            ColumnType::Numeric
        } else if self.distinct <= options.categorical_max_unique {
            ColumnType::Categorical
        } else {
            ColumnType::Text
        }
    }
}

/// Retypes every text column of `table` in place and returns the resulting
/// schema. Columns already typed (e.g. split categories) are left as they are.
pub fn infer_types(
    table: &mut Table,
    options: &InferenceOptions,
    report: &mut RunReport,
) -> Result<Schema, FrameError> {
    for name in table.text_columns_excluding(&[]) {
        let Some(cells) = table.column(&name).and_then(|c| c.as_text()) else {
            continue;
        };
        let decided = TypeCandidate::observe(cells).decide(options);
        let data = match decided {
            ColumnType::Text => continue,
            ColumnType::Boolean => ColumnData::Boolean(
                cells
                    .iter()
                    .map(|cell| match cell.as_deref() {
                        Some(value) => parse_flag(value),
                        None if options.fill_missing_flags => Some(false),
                        None => None,
                    })
                    .collect(),
            ),
            ColumnType::Numeric => ColumnData::Numeric(
                cells
                    .iter()
                    .map(|cell| cell.as_deref().and_then(parse_numeric))
                    .collect(),
            ),
            ColumnType::Categorical => ColumnData::Categorical(cells.to_vec()),
        };
        debug!("Column '{name}' inferred as {decided}");
        table.replace_data(&name, data)?;
        report.record(Stage::Infer, Some(name.as_str()), Action::Inferred, decided.as_str());
    }
    Ok(Schema::from_table(table))
}
