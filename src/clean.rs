use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{CleanArgs, InputArgs, PivotArgs},
    config::PipelineConfig,
    io_utils, persist, pipeline,
    pivot::pivot,
    report::{Action, RunReport},
    triples::{Triple, read_triples},
};

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            PipelineConfig::load(path).with_context(|| format!("Loading config from {path:?}"))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn load_triples(input: &InputArgs) -> Result<(Vec<Triple>, u8)> {
    let delimiter = io_utils::resolve_delimiter(Some(input.input.as_path()), input.delimiter);
    let encoding = io_utils::resolve_encoding(input.input_encoding.as_deref())?;
    info!(
        "Reading triples from '{}' (delimiter '{}')",
        input.input.display(),
        io_utils::printable_delimiter(delimiter)
    );
    let triples = read_triples(&input.input, delimiter, encoding)
        .with_context(|| format!("Reading triples from {:?}", input.input))?;
    Ok((triples, delimiter))
}

fn destination(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string())
}

pub fn execute(args: &CleanArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.exclude_columns.extend(args.exclude.iter().cloned());
    if let Some(max_variants) = args.max_variants {
        config.split.max_variants = max_variants;
    }
    if let Some(limit) = args.categorical_max_unique {
        config.inference.categorical_max_unique = limit;
    }
    if args.no_split {
        config.split.enabled = false;
    }
    if args.no_dedup {
        config.dedup.enabled = false;
    }
    if let Some(policy) = args.duplicate_keys {
        config.duplicate_keys = policy.into();
    }
    config.validate()?;

    let (triples, input_delimiter) = load_triples(&args.input)?;
    let outcome = pipeline::run(triples, &config)?;

    let output = args.output.as_deref();
    let output_delimiter =
        io_utils::resolve_output_delimiter(output, args.output_delimiter, input_delimiter);
    persist::write_csv(&outcome.table, output, output_delimiter)
        .with_context(|| format!("Writing table to {}", destination(output)))?;
    if let Some(path) = &args.binary {
        persist::save_binary(&outcome.table, path)?;
    }
    if let Some(path) = &args.schema {
        outcome.schema.save(path)?;
    }
    if let Some(path) = &args.report {
        outcome.report.save(path)?;
    }

    info!(
        "Wrote {} row(s) x {} column(s) -> {} ({} dropped triple(s), {} strip(s), {} split(s), {} duplicate column(s))",
        outcome.table.row_count(),
        outcome.table.columns().len(),
        destination(output),
        outcome.malformed.len(),
        outcome.stripped.len(),
        outcome.splits.len(),
        outcome.report.count(Action::DroppedColumn),
    );
    Ok(())
}

pub fn execute_pivot(args: &PivotArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(policy) = args.duplicate_keys {
        config.duplicate_keys = policy.into();
    }
    let (triples, input_delimiter) = load_triples(&args.input)?;
    let mut report = RunReport::new();
    let outcome = pivot(
        triples,
        &config.key_aliases,
        &config.index_column,
        config.duplicate_keys,
        &mut report,
    )
    .context("pivot stage failed")?;

    let output = args.output.as_deref();
    let delimiter = io_utils::resolve_output_delimiter(output, None, input_delimiter);
    persist::write_csv(&outcome.table, output, delimiter)
        .with_context(|| format!("Writing table to {}", destination(output)))?;
    info!(
        "Pivoted into {} row(s) x {} column(s) -> {} ({} conflicting value(s) dropped)",
        outcome.table.row_count(),
        outcome.table.columns().len(),
        destination(output),
        outcome.conflicts_dropped
    );
    Ok(())
}
