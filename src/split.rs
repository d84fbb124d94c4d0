use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    data::{Direction, anchored_slice, is_flag_literal, strip_anchored},
    frame::{Column, FrameError, Table},
    pattern::{DetectOptions, SPLIT_MIN_LENGTH, detect, detect_column},
    report::{Action, RunReport, Stage},
};

pub const DEFAULT_MAX_VARIANTS: usize = 5;

/// One categorical column carved out of a source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRecord {
    pub column: String,
    pub direction: Direction,
    pub new_column: String,
    /// Refined pattern per matched group, in group order.
    pub patterns: Vec<String>,
}

pub fn split_column_name(column: &str, direction: Direction) -> String {
    format!("{column}_{direction}")
}

/// Copying variant of [`split_in_place`].
pub fn split(
    table: &Table,
    exclude: &[String],
    max_variants: usize,
    report: &mut RunReport,
) -> Result<(Table, Vec<SplitRecord>), FrameError> {
    let mut copy = table.clone();
    let records = split_in_place(&mut copy, exclude, max_variants, report)?;
    Ok((copy, records))
}

/// Factors recurring prefixes/suffixes of each text column into a new
/// categorical `<column>_<direction>` column, stripping them from the source.
///
/// Grouping runs in two levels: the outer detection picks a length at which a
/// handful of variants recur, then each variant's rows are searched again for
/// the full token they share, which can be longer than the outer length.
/// Rows outside every group keep their value and get a missing category.
pub fn split_in_place(
    table: &mut Table,
    exclude: &[String],
    max_variants: usize,
    report: &mut RunReport,
) -> Result<Vec<SplitRecord>, FrameError> {
    let grouping = DetectOptions::grouping(max_variants);
    let refine = DetectOptions::unanimous(SPLIT_MIN_LENGTH);
    let mut records = Vec::new();

    for name in table.text_columns_excluding(exclude) {
        for direction in Direction::BOTH {
            let new_name = split_column_name(&name, direction);
            let Some(found) = table
                .column(&name)
                .and_then(|column| detect_column(column, direction, &grouping))
            else {
                debug!("No recurring {direction} pattern in column '{name}'");
                continue;
            };
            if table.has_column(&new_name) {
                warn!("Column '{new_name}' already exists; leaving '{name}' unsplit");
                report.record(
                    Stage::Split,
                    Some(name.as_str()),
                    Action::Skipped,
                    format!("target column '{new_name}' already exists"),
                );
                continue;
            }
            let Some(cells) = table.column_mut(&name).and_then(Column::as_text_mut) else {
                continue;
            };

            let snapshot = cells.clone();
            let mut categories: Vec<Option<String>> = vec![None; snapshot.len()];
            let mut patterns = Vec::with_capacity(found.variants.len());

            for variant in &found.variants {
                let rows = snapshot
                    .iter()
                    .enumerate()
                    .filter_map(|(row, cell)| {
                        let value = cell.as_deref()?;
                        (!is_flag_literal(value)
                            && anchored_slice(value, direction, found.length) == variant.as_str())
                            .then_some(row)
                    })
                    .collect::<Vec<_>>();
                let group = rows
                    .iter()
                    .map(|&row| snapshot[row].as_deref())
                    .collect::<Vec<_>>();
                let refined = detect(group.as_slice(), direction, &refine)
                    .and_then(|m| m.unanimous_text().map(str::to_string))
                    .unwrap_or_else(|| variant.clone());
                let refined_len = refined.chars().count();

                for &row in &rows {
                    if let Some(value) = cells[row].as_mut() {
                        *value = strip_anchored(value, direction, refined_len);
                    }
                    categories[row] = Some(refined.clone());
                }
                debug!(
                    "Column '{name}': {} row(s) grouped under \"{refined}\"",
                    rows.len()
                );
                patterns.push(refined);
            }

            info!(
                "Splitting {direction} of column '{name}' into '{new_name}': {}",
                patterns.iter().map(|p| format!("\"{p}\"")).collect::<Vec<_>>().join(", ")
            );
            report.record(
                Stage::Split,
                Some(name.as_str()),
                Action::Split,
                format!("{new_name} <- {}", patterns.join(" | ")),
            );
            table.push_column(Column::categorical(new_name.clone(), categories))?;
            records.push(SplitRecord {
                column: name.clone(),
                direction,
                new_column: new_name,
                patterns,
            });
        }
    }
    Ok(records)
}
