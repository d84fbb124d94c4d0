pub mod chop;
pub mod clean;
pub mod cli;
pub mod config;
pub mod data;
pub mod dedup;
pub mod detect;
pub mod fetch;
pub mod frame;
pub mod impute;
pub mod io_utils;
pub mod pattern;
pub mod persist;
pub mod pipeline;
pub mod pivot;
pub mod preview;
pub mod report;
pub mod schema;
pub mod split;
pub mod table;
pub mod triples;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, ConfigArgs},
    config::PipelineConfig,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tidy_scrape", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => clean::execute(&args),
        Commands::Pivot(args) => clean::execute_pivot(&args),
        Commands::Detect(args) => detect::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Config(args) => handle_config(&args),
    }
}

fn handle_config(args: &ConfigArgs) -> Result<()> {
    let config = PipelineConfig::default();
    match &args.output {
        Some(path) => {
            config.save(path)?;
            info!("Default configuration written to {path:?}");
        }
        None => print!("{}", config.to_yaml_string()?),
    }
    Ok(())
}
