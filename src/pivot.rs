//! Long-to-wide pivot of scraped triples.
//!
//! Before pivoting, [`KeyAlias`] rules rewrite the key of any triple whose
//! value starts with a known label, so that one concept scraped under several
//! key spellings lands in a single column. Rules are an explicit list; no
//! other key rewriting happens.
//!
//! An exact repeat of a triple collapses silently. The same (entity, key)
//! carrying a different value is resolved by [`DuplicateKeyPolicy`].

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    frame::{Column, FrameError, Table},
    report::{Action, RunReport, Stage},
    triples::{Triple, TripleField},
};

pub const DEFAULT_INDEX_NAME: &str = "ID";

#[derive(Debug, Error)]
pub enum PivotError {
    #[error(
        "duplicate key collision for entity '{entity}', key '{key}': \"{first}\" vs \"{second}\""
    )]
    DuplicateKeyCollision {
        entity: String,
        key: String,
        first: String,
        second: String,
    },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// What to do when one entity carries two different values for a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Keep the value seen first and report each value dropped.
    #[default]
    KeepFirst,
    /// Abort the pivot with [`PivotError::DuplicateKeyCollision`].
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAlias {
    pub value_prefix: String,
    pub canonical_key: String,
}

impl KeyAlias {
    pub fn new(value_prefix: &str, canonical_key: &str) -> Self {
        Self {
            value_prefix: value_prefix.to_string(),
            canonical_key: canonical_key.to_string(),
        }
    }
}

/// Elevation fields are emitted under several labels depending on the page
/// template; their values always carry one of these prefixes.
pub fn default_aliases() -> Vec<KeyAlias> {
    vec![
        KeyAlias::new("Gain: ", "Elevation_Gain"),
        KeyAlias::new("Highest Point: ", "Elevation_Peak"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedTriple {
    /// Zero-based position in the input stream.
    pub position: usize,
    pub missing: TripleField,
}

#[derive(Debug)]
pub struct PivotOutcome {
    pub table: Table,
    pub malformed: Vec<MalformedTriple>,
    pub duplicates_dropped: usize,
    /// Conflicting values discarded under [`DuplicateKeyPolicy::KeepFirst`].
    pub conflicts_dropped: usize,
}

/// Rewrites keys in place. Rules apply in order and a later match overrides
/// an earlier one.
pub fn apply_aliases(triples: &mut [Triple], aliases: &[KeyAlias]) -> usize {
    let mut rewritten = 0usize;
    for triple in triples.iter_mut() {
        let Some(value) = triple.value.as_deref() else {
            continue;
        };
        let canonical = aliases
            .iter()
            .rev()
            .find(|alias| value.starts_with(alias.value_prefix.as_str()))
            .map(|alias| alias.canonical_key.clone());
        if let Some(key) = canonical {
            if triple.key.as_deref() != Some(key.as_str()) {
                rewritten += 1;
            }
            triple.key = Some(key);
        }
    }
    rewritten
}

pub fn pivot(
    mut triples: Vec<Triple>,
    aliases: &[KeyAlias],
    index_name: &str,
    duplicate_keys: DuplicateKeyPolicy,
    report: &mut RunReport,
) -> Result<PivotOutcome, PivotError> {
    let rewritten = apply_aliases(&mut triples, aliases);
    if rewritten > 0 {
        debug!("Key aliasing rewrote {rewritten} triple(s)");
    }

    let mut entities: Vec<String> = Vec::new();
    let mut entity_rows: HashMap<String, usize> = HashMap::new();
    let mut keys: Vec<String> = Vec::new();
    let mut key_cols: HashMap<String, usize> = HashMap::new();
    let mut cells: HashMap<(usize, usize), String> = HashMap::new();
    let mut malformed = Vec::new();
    let mut duplicates_dropped = 0usize;
    let mut conflicts_dropped = 0usize;

    for (position, triple) in triples.into_iter().enumerate() {
        if let Some(missing) = triple.missing_field() {
            warn!("Dropping triple #{position}: missing {missing}");
            report.record(
                Stage::Pivot,
                triple.key.as_deref(),
                Action::DroppedTriple,
                format!("triple #{position} is missing its {missing}"),
            );
            malformed.push(MalformedTriple { position, missing });
            continue;
        }
        let (Some(entity), Some(key), Some(value)) = (triple.entity, triple.key, triple.value)
        else {
            continue;
        };

        let row = *entity_rows.entry(entity.clone()).or_insert_with(|| {
            entities.push(entity.clone());
            entities.len() - 1
        });
        let col = *key_cols.entry(key.clone()).or_insert_with(|| {
            keys.push(key.clone());
            keys.len() - 1
        });

        match cells.get(&(row, col)) {
            Some(existing) if *existing == value => duplicates_dropped += 1,
            Some(existing) => match duplicate_keys {
                DuplicateKeyPolicy::Error => {
                    return Err(PivotError::DuplicateKeyCollision {
                        entity,
                        key,
                        first: existing.clone(),
                        second: value,
                    });
                }
                DuplicateKeyPolicy::KeepFirst => {
                    warn!(
                        "Entity '{entity}' has conflicting values for '{key}': kept \"{existing}\", dropped \"{value}\""
                    );
                    report.record(
                        Stage::Pivot,
                        Some(key.as_str()),
                        Action::DroppedConflict,
                        format!("entity '{entity}' kept \"{existing}\", dropped \"{value}\""),
                    );
                    conflicts_dropped += 1;
                }
            },
            None => {
                cells.insert((row, col), value);
            }
        }
    }

    let mut columns = keys
        .into_iter()
        .map(|key| Column::text(key, vec![None; entities.len()]))
        .collect::<Vec<_>>();
    for ((row, col), value) in cells {
        if let Some(slot) = columns[col].as_text_mut().and_then(|c| c.get_mut(row)) {
            *slot = Some(value);
        }
    }

    if duplicates_dropped > 0 {
        report.record(
            Stage::Pivot,
            None,
            Action::DroppedTriple,
            format!("{duplicates_dropped} exact duplicate triple(s)"),
        );
    }
    let table = Table::new(index_name, entities, columns)?;
    Ok(PivotOutcome {
        table,
        malformed,
        duplicates_dropped,
        conflicts_dropped,
    })
}
