//! Fixed-order normalization run: Pivot → Chop → Split → Dedup → Infer, with
//! an optional coordinate Impute pass on the typed table.
//!
//! The driver owns the table for the whole run and hands it back, together
//! with the audit report, only once every stage has finished.

use anyhow::{Context, Result};
use log::info;

use crate::{
    chop::{ChopOptions, StripRecord, chop_in_place},
    config::PipelineConfig,
    dedup::{DuplicatePair, drop_duplicates},
    frame::Table,
    impute::{ImputeSummary, impute_group_means},
    pivot::{MalformedTriple, pivot},
    report::{RunReport, Stage},
    schema::{Schema, infer_types},
    split::{SplitRecord, split_in_place},
    triples::Triple,
};

#[derive(Debug)]
pub struct PipelineOutcome {
    pub table: Table,
    pub schema: Schema,
    pub report: RunReport,
    pub malformed: Vec<MalformedTriple>,
    pub stripped: Vec<StripRecord>,
    pub splits: Vec<SplitRecord>,
    pub duplicates: Vec<DuplicatePair>,
    pub imputed: Vec<ImputeSummary>,
}

fn stage_context(stage: Stage) -> String {
    format!("{stage} stage failed")
}

pub fn run(triples: Vec<Triple>, config: &PipelineConfig) -> Result<PipelineOutcome> {
    let mut report = RunReport::new();
    let triple_count = triples.len();

    let pivoted = pivot(
        triples,
        &config.key_aliases,
        &config.index_column,
        config.duplicate_keys,
        &mut report,
    )
    .with_context(|| stage_context(Stage::Pivot))?;
    let mut table = pivoted.table;
    info!(
        "Pivoted {} triple(s) into {} row(s) x {} column(s)",
        triple_count,
        table.row_count(),
        table.columns().len()
    );

    let stripped = if config.chop.enabled {
        let options = ChopOptions {
            directions: config.chop.directions.clone(),
            ..ChopOptions::default()
        };
        chop_in_place(&mut table, &config.exclude_columns, &options, &mut report)
    } else {
        Vec::new()
    };

    let splits = if config.split.enabled {
        split_in_place(
            &mut table,
            &config.exclude_columns,
            config.split.max_variants,
            &mut report,
        )
        .with_context(|| stage_context(Stage::Split))?
    } else {
        Vec::new()
    };

    let duplicates = if config.dedup.enabled {
        let (pairs, dropped) =
            drop_duplicates(&mut table, &mut report).with_context(|| stage_context(Stage::Dedup))?;
        if !dropped.is_empty() {
            info!("Dropped {} duplicate column(s)", dropped.len());
        }
        pairs
    } else {
        Vec::new()
    };

    let mut schema = infer_types(&mut table, &config.inference, &mut report)
        .with_context(|| stage_context(Stage::Infer))?;

    let imputed = if config.impute.enabled {
        let summaries = impute_group_means(&mut table, &config.impute, &mut report)
            .with_context(|| stage_context(Stage::Impute))?;
        schema = Schema::from_table(&table);
        summaries
    } else {
        Vec::new()
    };

    Ok(PipelineOutcome {
        table,
        schema,
        report,
        malformed: pivoted.malformed,
        stripped,
        splits,
        duplicates,
        imputed,
    })
}
