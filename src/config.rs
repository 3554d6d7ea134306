//! Runtime configuration for kv-cache-evict.
//!
//! Configuration can be loaded from a JSON file, overridden from environment
//! variables, or constructed programmatically. Nothing here is process-global:
//! the cache manager builds one [`Config`], turns it into an
//! [`EvictionStrategy`] once at startup and keeps that strategy for the
//! lifetime of the cache.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::strategy::{EvictionStrategy, PolicyKind, StrategyParams};

/// Environment variable that selects the eviction policy by name.
pub const ENV_EVICTION_POLICY: &str = "EVICTION_POLICY";

/// Environment variable that sets the sink token count.
pub const ENV_SINK_TOKEN_COUNT: &str = "SINK_TOKEN_COUNT";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown eviction policy {0:?} (expected one of: lru, lfu, fifo, mru, filo, priority, sink_lru)")]
    UnknownPolicy(String),

    #[error("sink_token_count must be non-negative, got {0}")]
    NegativeSinkTokenCount(i64),

    #[error("Eviction policy {policy} does not take parameter {parameter}")]
    UnexpectedParameter {
        policy: PolicyKind,
        parameter: &'static str,
    },

    #[error("Invalid value {value:?} for environment variable {var}")]
    InvalidEnvValue { var: &'static str, value: String },

    #[error("sink_token_count {0} does not fit in a configuration value")]
    SinkTokenCountOutOfRange(u64),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Eviction policy selection.
    pub eviction: EvictionConfig,
}

/// Which eviction strategy to build, and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionConfig {
    /// Catalog name of the strategy (e.g. "lru", "sink_lru").
    pub policy: String,

    /// Number of leading sequence tokens protected by `sink_lru`.
    ///
    /// Left unset, `sink_lru` protects the first four tokens. Setting it for
    /// any other policy is rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink_token_count: Option<i64>,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Lru.to_string(),
            sink_token_count: None,
        }
    }
}

impl EvictionConfig {
    /// Validate the configuration and build the strategy it names.
    pub fn build(&self) -> Result<EvictionStrategy, ConfigError> {
        let params = StrategyParams {
            sink_token_count: self.sink_token_count,
        };
        let strategy = EvictionStrategy::new(&self.policy, params)?;
        tracing::info!(strategy = %strategy, "Eviction strategy configured");
        Ok(strategy)
    }
}

impl TryFrom<&EvictionStrategy> for EvictionConfig {
    type Error = ConfigError;

    /// The configuration that builds `strategy`.
    ///
    /// Fails for a sink count above `i64::MAX`, which no configuration can
    /// express.
    fn try_from(strategy: &EvictionStrategy) -> Result<Self, Self::Error> {
        let sink_token_count = match *strategy {
            EvictionStrategy::SinkLru { sink_token_count } => Some(
                i64::try_from(sink_token_count)
                    .map_err(|_| ConfigError::SinkTokenCountOutOfRange(sink_token_count))?,
            ),
            _ => None,
        };
        Ok(Self {
            policy: strategy.kind().to_string(),
            sink_token_count,
        })
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Override fields from variables resolved through `lookup`.
    ///
    /// Unset variables leave the field untouched; an empty policy name is
    /// treated as unset. `SINK_TOKEN_COUNT` is deployment-wide: it is
    /// validated here, but only reaches the configuration when the resolved
    /// policy is `sink_lru`, since no other policy takes it.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(policy) = lookup(ENV_EVICTION_POLICY) {
            let policy = policy.trim();
            if !policy.is_empty() {
                self.eviction.policy = policy.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_SINK_TOKEN_COUNT) {
            let count = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidEnvValue {
                    var: ENV_SINK_TOKEN_COUNT,
                    value: raw.clone(),
                })?;
            if count < 0 {
                return Err(ConfigError::NegativeSinkTokenCount(count));
            }

            match self.eviction.policy.parse::<PolicyKind>() {
                Ok(PolicyKind::SinkLru) => self.eviction.sink_token_count = Some(count),
                _ => tracing::debug!(
                    policy = %self.eviction.policy,
                    sink_token_count = count,
                    "Ignoring SINK_TOKEN_COUNT for a policy without sink protection"
                ),
            }
        }

        Ok(())
    }

    /// Build the configured eviction strategy.
    pub fn build_strategy(&self) -> Result<EvictionStrategy, ConfigError> {
        self.eviction.build()
    }
}
