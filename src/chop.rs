use log::{debug, info};
use serde::Serialize;

use crate::{
    data::{Direction, is_flag_literal, strip_anchored},
    frame::Table,
    pattern::{DetectOptions, detect},
    report::{Action, RunReport, Stage},
};

/// Literal text removed from one end of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripRecord {
    pub column: String,
    pub direction: Direction,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChopOptions {
    pub directions: Vec<Direction>,
    pub min_length: usize,
}

impl Default for ChopOptions {
    fn default() -> Self {
        Self {
            directions: Direction::BOTH.to_vec(),
            min_length: 1,
        }
    }
}

/// Copying variant of [`chop_in_place`]; the input table is left untouched.
pub fn chop(
    table: &Table,
    exclude: &[String],
    options: &ChopOptions,
    report: &mut RunReport,
) -> (Table, Vec<StripRecord>) {
    let mut copy = table.clone();
    let stripped = chop_in_place(&mut copy, exclude, options, report);
    (copy, stripped)
}

/// Strips a prefix and/or suffix shared verbatim by every value of each text
/// column. Each direction is detected on the column as left by the previous
/// one, so the two strips never overlap.
pub fn chop_in_place(
    table: &mut Table,
    exclude: &[String],
    options: &ChopOptions,
    report: &mut RunReport,
) -> Vec<StripRecord> {
    let detect_options = DetectOptions::unanimous(options.min_length);
    let mut stripped = Vec::new();

    for name in table.text_columns_excluding(exclude) {
        let Some(cells) = table.column_mut(&name).and_then(|c| c.as_text_mut()) else {
            continue;
        };
        for &direction in &options.directions {
            let Some(found) = detect(cells.as_slice(), direction, &detect_options) else {
                debug!("No shared {direction} text in column '{name}'");
                continue;
            };
            let Some(text) = found.unanimous_text().map(str::to_string) else {
                continue;
            };
            for value in cells.iter_mut().flatten().filter(|v| !is_flag_literal(v)) {
                *value = strip_anchored(value, direction, found.length);
            }
            info!("Column '{name}': removed \"{text}\" from {direction}");
            let action = match direction {
                Direction::Start => Action::StripStart,
                Direction::End => Action::StripEnd,
            };
            report.record(Stage::Chop, Some(name.as_str()), action, text.clone());
            stripped.push(StripRecord {
                column: name.clone(),
                direction,
                text,
            });
        }
    }
    stripped
}
