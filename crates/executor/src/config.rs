use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use fraud_ring_core::SearchLimits;

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    pub num_users: usize,
    pub num_transactions: usize,
    /// Share of the transaction budget spent on injected rings.
    pub ring_ratio: f64,
    pub min_ring_len: usize,
    pub max_ring_len: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub dense_max_depth: usize,
    pub dense_degree_threshold: f64,
    pub exploration_budget: usize,
    pub component_budget: usize,
}

impl From<&SearchConfig> for SearchLimits {
    fn from(cfg: &SearchConfig) -> Self {
        SearchLimits {
            max_depth: cfg.max_depth,
            dense_max_depth: cfg.dense_max_depth,
            dense_degree_threshold: cfg.dense_degree_threshold,
            exploration_budget: cfg.exploration_budget,
            component_budget: cfg.component_budget,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    pub channel_capacity: usize,
    pub batch_size: usize,
    /// Upper bound on the account count of a graph sized from raw input.
    pub max_accounts: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub max_cycles_shown: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub search: SearchConfig,
    pub pipeline: PipelineConfig,
    pub report: ReportConfig,
}

/// Loads configuration from `crates/executor/Config.toml` under the current
/// directory, overlaid by `EXECUTOR__*` environment variables.
pub fn load_config() -> Result<Config, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    let config_file_path: PathBuf = base_path
        .join("crates")
        .join("executor")
        .join("Config.toml");

    load_config_from(&config_file_path)
}

/// Loads configuration from an explicit file path.
pub fn load_config_from(config_file_path: &Path) -> Result<Config, Error> {
    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path).required(true))
        .add_source(
            Environment::with_prefix("EXECUTOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    validate(&app_config)?;

    Ok(app_config)
}

fn validate(cfg: &Config) -> Result<(), Error> {
    let generator = &cfg.generator;
    if generator.min_ring_len < 3 || generator.min_ring_len > generator.max_ring_len {
        return Err(Error::ConfigLoadError(format!(
            "Ring length range {}..={} is invalid; rings need at least 3 accounts.",
            generator.min_ring_len, generator.max_ring_len
        )));
    }
    if !(0.0..=1.0).contains(&generator.ring_ratio) {
        return Err(Error::ConfigLoadError(format!(
            "ring_ratio {} must lie in [0, 1].",
            generator.ring_ratio
        )));
    }
    if cfg.pipeline.batch_size == 0 || cfg.pipeline.channel_capacity == 0 {
        return Err(Error::ConfigLoadError(
            "Pipeline batch_size and channel_capacity must be positive.".to_string(),
        ));
    }
    let max_accounts = cfg.pipeline.max_accounts;
    if max_accounts == 0 || max_accounts.checked_mul(max_accounts).is_none() {
        return Err(Error::ConfigLoadError(format!(
            "max_accounts {} must be positive and its square must fit in usize.",
            max_accounts
        )));
    }
    Ok(())
}
