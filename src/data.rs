use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal spellings of scraped presence flags.
pub const FLAG_TRUE: &str = "True";
pub const FLAG_FALSE: &str = "False";

/// Which end of a value a pattern is anchored to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "prefix")]
    Start,
    #[serde(alias = "suffix")]
    End,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Start, Direction::End];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Start => "start",
            Direction::End => "end",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Borrowed view of a single non-missing cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    Text(&'a str),
    Boolean(bool),
    Numeric(f64),
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Text(text) => f.write_str(text),
            ValueRef::Boolean(true) => f.write_str(FLAG_TRUE),
            ValueRef::Boolean(false) => f.write_str(FLAG_FALSE),
            // Whole numbers print without a trailing `.0`.
            ValueRef::Numeric(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                write!(f, "{}", *n as i64)
            }
            ValueRef::Numeric(n) => write!(f, "{n}"),
        }
    }
}

/// True for the literal `True`/`False` strings scrapers emit for presence flags.
pub fn is_flag_literal(value: &str) -> bool {
    value == FLAG_TRUE || value == FLAG_FALSE
}

pub fn parse_flag(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Returns the first or last `length` characters of `value`, staying UTF-8 safe.
pub fn anchored_slice(value: &str, direction: Direction, length: usize) -> &str {
    let total = char_len(value);
    let length = length.min(total);
    match direction {
        Direction::Start => &value[..byte_offset(value, length)],
        Direction::End => &value[byte_offset(value, total - length)..],
    }
}

/// Removes `length` characters from the given end of `value`.
pub fn strip_anchored(value: &str, direction: Direction, length: usize) -> String {
    let total = char_len(value);
    let length = length.min(total);
    match direction {
        Direction::Start => value[byte_offset(value, length)..].to_string(),
        Direction::End => value[..byte_offset(value, total - length)].to_string(),
    }
}

fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}
