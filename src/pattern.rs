//! Detection of repeated literal substrings anchored at the start or end of
//! every value in a column.
//!
//! Candidate lengths are scanned longest-first, from the length of the
//! shortest qualifying value down to `min_length`. A length qualifies when
//! the number of distinct substrings found at that length falls inside
//! `[min_unique, max_unique]` and their ratio to the number of distinct values
//! stays at or below `ratio`. The first qualifying length wins, so a longer
//! shared pattern is always preferred over a shorter one.

use std::collections::HashSet;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    data::{Direction, anchored_slice, char_len, is_flag_literal},
    frame::Column,
};

/// Minimum pattern length used when grouping values into categories.
pub const SPLIT_MIN_LENGTH: usize = 5;
/// Ratio ceiling used when grouping values into categories.
pub const SPLIT_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectOptions {
    pub min_unique: usize,
    pub max_unique: usize,
    pub ratio: f64,
    pub min_length: usize,
}

impl DetectOptions {
    /// Only a substring literally identical across every value qualifies.
    pub fn unanimous(min_length: usize) -> Self {
        Self {
            min_unique: 1,
            max_unique: 1,
            ratio: 1.0,
            min_length,
        }
    }

    /// A bounded number of recurring variants qualifies.
    pub fn grouping(max_variants: usize) -> Self {
        Self {
            min_unique: 2,
            max_unique: max_variants,
            ratio: SPLIT_RATIO,
            min_length: SPLIT_MIN_LENGTH,
        }
    }

    fn accepts(&self, variant_count: usize, distinct_values: usize) -> bool {
        variant_count >= self.min_unique
            && variant_count <= self.max_unique
            && (variant_count as f64 / distinct_values as f64) <= self.ratio
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    /// Pattern length in characters.
    pub length: usize,
    pub direction: Direction,
    /// Distinct substrings at `length`, in order of first appearance.
    pub variants: Vec<String>,
}

impl PatternMatch {
    /// The single variant of a unanimous match.
    pub fn unanimous_text(&self) -> Option<&str> {
        match self.variants.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Runs detection on a column; only free-text columns are considered.
pub fn detect_column(
    column: &Column,
    direction: Direction,
    options: &DetectOptions,
) -> Option<PatternMatch> {
    detect(column.as_text()?, direction, options)
}

pub fn detect<S: AsRef<str>>(
    cells: &[Option<S>],
    direction: Direction,
    options: &DetectOptions,
) -> Option<PatternMatch> {
    let values = cells
        .iter()
        .filter_map(|cell| cell.as_ref().map(AsRef::<str>::as_ref))
        .filter(|value| !is_flag_literal(value))
        .collect::<Vec<&str>>();
    let distinct = values.iter().copied().collect::<HashSet<&str>>();
    if distinct.len() < 2 {
        return None;
    }
    let shortest = distinct.iter().map(|value| char_len(value)).min()?;

    (options.min_length.max(1)..=shortest)
        .rev()
        .find_map(|length| {
            let variants = values
                .iter()
                .map(|value| anchored_slice(value, direction, length))
                .unique()
                .collect::<Vec<_>>();
            options
                .accepts(variants.len(), distinct.len())
                .then(|| PatternMatch {
                    length,
                    direction,
                    variants: variants.into_iter().map(str::to_string).collect(),
                })
        })
}
