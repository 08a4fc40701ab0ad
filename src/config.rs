//! Core configuration, loaded from a TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::oracle::DEFAULT_STALE_WINDOW_SECS;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oracle: OracleConfig,
    pub executor: ExecutorConfig,
    pub vault: VaultConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Maximum report age, in seconds, accepted by fresh reads.
    pub stale_window_secs: i64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Floor applied by operators when building instructions, in base
    /// units. The executor also honors the per-instruction minimum.
    pub min_profit: u64,
    /// Whether the executor comes up paused.
    pub start_paused: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// APY improvement, in basis points, an operator requires before
    /// triggering a rebalance. Advisory: rebalancing itself is explicit.
    pub rotation_threshold_bps: u32,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle.stale_window_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "oracle.stale_window_secs",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle: OracleConfig::default(),
            executor: ExecutorConfig::default(),
            vault: VaultConfig::default(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            stale_window_secs: DEFAULT_STALE_WINDOW_SECS,
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            min_profit: 0,
            start_paused: false,
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            rotation_threshold_bps: 100,
        }
    }
}
