use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{data::Direction, pivot::DuplicateKeyPolicy};

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize scraped triples into tidy tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pivot, chop, split, de-duplicate, and type a molten triple file
    Clean(CleanArgs),
    /// Pivot a molten triple file into a wide table without cleaning it
    Pivot(PivotArgs),
    /// Run pattern detection on one column of a wide CSV
    Detect(DetectArgs),
    /// Preview the first rows of a binary table
    Preview(PreviewArgs),
    /// Write the default pipeline configuration as YAML
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Molten CSV with ID, Key, and Value columns (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults to the input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Also write the typed table in native binary form
    #[arg(long = "binary")]
    pub binary: Option<PathBuf>,
    /// Write the run report as JSON
    #[arg(long = "report")]
    pub report: Option<PathBuf>,
    /// Write the inferred column types as JSON
    #[arg(long = "schema")]
    pub schema: Option<PathBuf>,
    /// Pipeline configuration file (YAML)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Columns the chop and split passes must leave untouched
    #[arg(long = "exclude", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,
    /// Maximum number of variants a split pattern may have
    #[arg(long = "max-variants")]
    pub max_variants: Option<usize>,
    /// Text columns with at most this many distinct values become categorical
    #[arg(long = "categorical-max-unique")]
    pub categorical_max_unique: Option<usize>,
    /// Skip the categorical split pass
    #[arg(long = "no-split")]
    pub no_split: bool,
    /// Keep structurally duplicate columns
    #[arg(long = "no-dedup")]
    pub no_dedup: bool,
    /// How to resolve an entity carrying two different values for one key
    #[arg(long = "duplicate-keys", value_enum)]
    pub duplicate_keys: Option<DuplicateKeysArg>,
}

#[derive(Debug, Args)]
pub struct PivotArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Pipeline configuration file supplying key aliases and index name
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// How to resolve an entity carrying two different values for one key
    #[arg(long = "duplicate-keys", value_enum)]
    pub duplicate_keys: Option<DuplicateKeysArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum DuplicateKeysArg {
    KeepFirst,
    Error,
}

impl From<DuplicateKeysArg> for DuplicateKeyPolicy {
    fn from(value: DuplicateKeysArg) -> Self {
        match value {
            DuplicateKeysArg::KeepFirst => DuplicateKeyPolicy::KeepFirst,
            DuplicateKeysArg::Error => DuplicateKeyPolicy::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum DirectionArg {
    #[value(alias = "prefix")]
    Start,
    #[value(alias = "suffix")]
    End,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Start => Direction::Start,
            DirectionArg::End => Direction::End,
        }
    }
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Wide CSV whose first column is the entity index
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column to inspect
    #[arg(short = 'C', long = "column")]
    pub column: String,
    /// Anchor the search at the start or end of each value
    #[arg(long, value_enum, default_value = "start")]
    pub direction: DirectionArg,
    /// Minimum number of distinct variants
    #[arg(long = "min-unique", default_value_t = 1)]
    pub min_unique: usize,
    /// Maximum number of distinct variants
    #[arg(long = "max-unique", default_value_t = 1)]
    pub max_unique: usize,
    /// Maximum ratio of variants to distinct values
    #[arg(long, default_value_t = 1.0)]
    pub ratio: f64,
    /// Shortest pattern length considered
    #[arg(long = "min-length", default_value_t = 1)]
    pub min_length: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Binary table written by `clean --binary`
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Destination YAML file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
