use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    data::Direction,
    impute::ImputeConfig,
    pivot::{DEFAULT_INDEX_NAME, DuplicateKeyPolicy, KeyAlias, default_aliases},
    schema::InferenceOptions,
    split::DEFAULT_MAX_VARIANTS,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChopConfig {
    pub enabled: bool,
    pub directions: Vec<Direction>,
}

impl Default for ChopConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directions: Direction::BOTH.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplitConfig {
    pub enabled: bool,
    pub max_variants: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_variants: DEFAULT_MAX_VARIANTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DedupConfig {
    pub enabled: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for one normalization run, loadable from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub index_column: String,
    /// Columns that the string passes (chop and split) never touch.
    pub exclude_columns: Vec<String>,
    pub key_aliases: Vec<KeyAlias>,
    /// Resolution of one entity carrying two different values for a key.
    pub duplicate_keys: DuplicateKeyPolicy,
    pub chop: ChopConfig,
    pub split: SplitConfig,
    pub dedup: DedupConfig,
    pub inference: InferenceOptions,
    /// Group-mean estimation of missing coordinates; off unless enabled.
    pub impute: ImputeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            index_column: DEFAULT_INDEX_NAME.to_string(),
            exclude_columns: Vec::new(),
            key_aliases: default_aliases(),
            duplicate_keys: DuplicateKeyPolicy::default(),
            chop: ChopConfig::default(),
            split: SplitConfig::default(),
            dedup: DedupConfig::default(),
            inference: InferenceOptions::default(),
            impute: ImputeConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: PipelineConfig =
            serde_yaml::from_reader(BufReader::new(file)).context("Parsing config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing config YAML")
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing config to YAML string")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.index_column.trim().is_empty(),
            "index_column must not be empty"
        );
        ensure!(
            self.split.max_variants >= 2,
            "split.max_variants must be at least 2 (got {})",
            self.split.max_variants
        );
        if self.impute.enabled {
            ensure!(
                !self.impute.group_by.trim().is_empty(),
                "impute.group_by must name a column"
            );
            ensure!(
                !self.impute.columns.is_empty(),
                "impute.columns must list at least one numeric column"
            );
            ensure!(
                !self.impute.provenance_column.trim().is_empty(),
                "impute.provenance_column must not be empty"
            );
        }
        for alias in &self.key_aliases {
            ensure!(
                !alias.value_prefix.is_empty() && !alias.canonical_key.is_empty(),
                "key alias entries need both value_prefix and canonical_key"
            );
        }
        Ok(())
    }
}
