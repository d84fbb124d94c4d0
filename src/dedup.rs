//! Structural duplicate-column removal.
//!
//! Every ordered pair of columns is compared, which is O(k² · n) for `k`
//! columns of `n` rows. Scraped tables carry tens of columns, so the pairwise
//! scan stays cheap; the earlier column of a duplicate pair is always the one
//! kept.

use std::collections::BTreeSet;

use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::{
    frame::{Column, FrameError, Table},
    report::{Action, RunReport, Stage},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    pub kept: String,
    pub dropped: String,
}

/// Null-aware equality: same missing positions and equal aligned values.
pub fn columns_match(left: &Column, right: &Column) -> bool {
    if left.len() != right.len() || left.missing_count() != right.missing_count() {
        return false;
    }
    (0..left.len()).all(|row| left.value(row) == right.value(row))
}

/// Scans all column pairs without mutating the table.
pub fn find_duplicates(table: &Table) -> Vec<DuplicatePair> {
    table
        .columns()
        .iter()
        .tuple_combinations()
        .filter(|(earlier, later)| columns_match(earlier, later))
        .map(|(earlier, later)| DuplicatePair {
            kept: earlier.name.clone(),
            dropped: later.name.clone(),
        })
        .collect()
}

/// Removes every later duplicate once the full scan has finished. Returns the
/// pairs found and the names removed, in table order.
pub fn drop_duplicates(
    table: &mut Table,
    report: &mut RunReport,
) -> Result<(Vec<DuplicatePair>, Vec<String>), FrameError> {
    let pairs = find_duplicates(table);
    for pair in &pairs {
        info!("Duplicate columns: {}, {}", pair.kept, pair.dropped);
        report.record(
            Stage::Dedup,
            Some(pair.dropped.as_str()),
            Action::DuplicateOf,
            pair.kept.clone(),
        );
    }

    let flagged = pairs
        .iter()
        .map(|pair| pair.dropped.as_str())
        .collect::<BTreeSet<_>>();
    let dropped = table
        .column_names()
        .into_iter()
        .filter(|name| flagged.contains(name.as_str()))
        .collect::<Vec<_>>();
    for name in &dropped {
        table.remove_column(name)?;
        info!("Dropping column '{name}'");
        report.record(Stage::Dedup, Some(name.as_str()), Action::DroppedColumn, "duplicate");
    }
    Ok((pairs, dropped))
}
