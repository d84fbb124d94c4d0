//! Wide table model shared by every normalization stage.
//!
//! A [`Table`] is an ordered list of named [`Column`]s aligned to one index of
//! entity identifiers. Cells are explicit `Option`s so "missing" is never a
//! sentinel string. Column storage is a tagged variant ([`ColumnData`]) and the
//! variant only changes once, during type inference, after every string pass
//! has run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{data::ValueRef, schema::ColumnType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("column '{column}' has {actual} row(s) but the index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("column '{0}' has the same name as the index")]
    ShadowsIndex(String),
    #[error("entity '{0}' appears more than once in the index")]
    DuplicateEntity(String),
    #[error("column '{0}' not found")]
    UnknownColumn(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Categorical(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    Numeric(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(cells) | ColumnData::Categorical(cells) => cells.len(),
            ColumnData::Boolean(cells) => cells.len(),
            ColumnData::Numeric(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Categorical(_) => ColumnType::Categorical,
            ColumnData::Boolean(_) => ColumnType::Boolean,
            ColumnData::Numeric(_) => ColumnType::Numeric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn text<S: Into<String>>(name: S, cells: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(cells),
        }
    }

    pub fn categorical<S: Into<String>>(name: S, cells: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(cells),
        }
    }

    /// Builds a text column from string literals; handy in tests and fixtures.
    pub fn from_strs<S: Into<String>>(name: S, cells: &[Option<&str>]) -> Self {
        Self::text(
            name,
            cells.iter().map(|cell| cell.map(str::to_string)).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    /// Cells of a free-text column; `None` for any other column type.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(cells) => Some(cells),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Vec<Option<String>>> {
        match &mut self.data {
            ColumnData::Text(cells) => Some(cells),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(cells) => Some(cells),
            _ => None,
        }
    }

    pub fn as_numeric_mut(&mut self) -> Option<&mut Vec<Option<f64>>> {
        match &mut self.data {
            ColumnData::Numeric(cells) => Some(cells),
            _ => None,
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        self.value(row).is_none()
    }

    pub fn value(&self, row: usize) -> Option<ValueRef<'_>> {
        match &self.data {
            ColumnData::Text(cells) | ColumnData::Categorical(cells) => {
                cells.get(row)?.as_deref().map(ValueRef::Text)
            }
            ColumnData::Boolean(cells) => cells.get(row).copied().flatten().map(ValueRef::Boolean),
            ColumnData::Numeric(cells) => cells.get(row).copied().flatten().map(ValueRef::Numeric),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index_name: String,
    index: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new<S: Into<String>>(
        index_name: S,
        index: Vec<String>,
        columns: Vec<Column>,
    ) -> Result<Self, FrameError> {
        let mut seen = HashSet::with_capacity(index.len());
        for entity in &index {
            if !seen.insert(entity.as_str()) {
                return Err(FrameError::DuplicateEntity(entity.clone()));
            }
        }
        let mut table = Self {
            index_name: index_name.into(),
            index,
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Appends a column, enforcing unique names and index-aligned length. A
    /// column may not reuse the index name, since both land in one header row.
    pub fn push_column(&mut self, column: Column) -> Result<(), FrameError> {
        let actual = column.len();
        if actual != self.index.len() {
            return Err(FrameError::LengthMismatch {
                column: column.name,
                expected: self.index.len(),
                actual,
            });
        }
        if column.name == self.index_name {
            return Err(FrameError::ShadowsIndex(column.name));
        }
        if self.has_column(&column.name) {
            return Err(FrameError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column, FrameError> {
        let position = self
            .column_position(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))?;
        Ok(self.columns.remove(position))
    }

    /// Replaces a column's storage; used by type inference to retype in place.
    pub fn replace_data(&mut self, name: &str, data: ColumnData) -> Result<(), FrameError> {
        let expected = self.index.len();
        let column = self
            .column_mut(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))?;
        if data.len() != expected {
            return Err(FrameError::LengthMismatch {
                column: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        column.data = data;
        Ok(())
    }

    /// Row-major string rendering, with missing cells as empty strings.
    pub fn display_rows(&self, limit: Option<usize>) -> Vec<Vec<String>> {
        let take = limit.unwrap_or(self.row_count()).min(self.row_count());
        (0..take)
            .map(|row| {
                let mut cells = Vec::with_capacity(self.columns.len() + 1);
                cells.push(self.index[row].clone());
                cells.extend(self.columns.iter().map(|column| {
                    column
                        .value(row)
                        .map(|value| value.to_string())
                        .unwrap_or_default()
                }));
                cells
            })
            .collect()
    }

    /// Returns the names of text columns that a string pass should visit.
    pub fn text_columns_excluding(&self, exclude: &[String]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_text().is_some())
            .filter(|c| !exclude.iter().any(|e| e == &c.name))
            .map(|c| c.name.clone())
            .collect()
    }
}
