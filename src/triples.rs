use std::{fmt, path::Path};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::io_utils;

const ENTITY_HEADERS: &[&str] = &["id", "entityid", "entity_id", "entity"];
const KEY_HEADERS: &[&str] = &["key"];
const VALUE_HEADERS: &[&str] = &["value"];

/// One scraped fact in long format. Fields are optional because scrapers do
/// emit incomplete rows; those are dropped by the pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub entity: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Triple {
    pub fn new(entity: &str, key: &str, value: &str) -> Self {
        Self {
            entity: Some(entity.to_string()),
            key: Some(key.to_string()),
            value: Some(value.to_string()),
        }
    }

    pub fn missing_field(&self) -> Option<TripleField> {
        if self.entity.is_none() {
            Some(TripleField::Entity)
        } else if self.key.is_none() {
            Some(TripleField::Key)
        } else if self.value.is_none() {
            Some(TripleField::Value)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripleField {
    Entity,
    Key,
    Value,
}

impl fmt::Display for TripleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripleField::Entity => "entity",
            TripleField::Key => "key",
            TripleField::Value => "value",
        };
        write!(f, "{label}")
    }
}

/// Reads a molten `ID,Key,Value` file. Empty cells become missing fields.
pub fn read_triples(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<Triple>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let entity_idx = find_header(&headers, ENTITY_HEADERS)?;
    let key_idx = find_header(&headers, KEY_HEADERS)?;
    let value_idx = find_header(&headers, VALUE_HEADERS)?;

    let mut triples = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        let field = |position: usize| {
            decoded
                .get(position)
                .filter(|value| !value.is_empty())
                .cloned()
        };
        triples.push(Triple {
            entity: field(entity_idx),
            key: field(key_idx),
            value: field(value_idx),
        });
    }
    Ok(triples)
}

fn find_header(headers: &[String], candidates: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|header| {
            let lowered = header.trim().to_ascii_lowercase();
            candidates.contains(&lowered.as_str())
        })
        .ok_or_else(|| {
            anyhow!(
                "Triple file is missing a '{}' column (found: {})",
                candidates[0],
                headers.join(", ")
            )
        })
}
