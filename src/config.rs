//! 配置模块：从 YAML/JSON 加载资源池与重试策略配置。
//!
//! # Configuration
//!
//! ```yaml
//! initial_weight: 1000
//! min_weight: 1
//! max_weight: 1000
//! strategy:
//!   type: split
//!   increment: { type: fixed_delta, delta: 1000 }
//!   decrement: { type: exponential, magnitude: 100 }
//! retry:
//!   max_attempts: 3
//! ```
//!
//! Every field is optional; omitted fields take the production defaults.

use crate::retry::predicate;
use crate::weight::{
    DefaultStrategy, Exponential, FixedDelta, Noop, Split, WeightItem, WeightStrategy,
    DEFAULT_MAX_WEIGHT, DEFAULT_MIN_WEIGHT, DEFAULT_WEIGHT,
};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Serializable description of a [`WeightStrategy`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    FixedDelta {
        delta: i64,
    },
    Exponential {
        magnitude: f64,
    },
    Noop,
    Split {
        increment: Box<StrategyConfig>,
        decrement: Box<StrategyConfig>,
    },
    #[default]
    Default,
}

impl StrategyConfig {
    pub fn build(&self) -> Result<Arc<dyn WeightStrategy>> {
        Ok(match self {
            StrategyConfig::FixedDelta { delta } => Arc::new(FixedDelta::new(*delta)),
            StrategyConfig::Exponential { magnitude } => {
                Arc::new(Exponential::new(*magnitude).map_err(|e| {
                    Error::configuration_with_context(
                        e.to_string(),
                        ErrorContext::new()
                            .with_field_path("strategy.magnitude")
                            .with_source("strategy_config"),
                    )
                })?)
            }
            StrategyConfig::Noop => Arc::new(Noop),
            StrategyConfig::Split {
                increment,
                decrement,
            } => Arc::new(Split::new(increment.build()?, decrement.build()?)),
            StrategyConfig::Default => Arc::new(DefaultStrategy::new()),
        })
    }
}

/// Retry budget shared by collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_attempts: predicate::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicyConfig {
    pub fn predicate<E>(&self) -> impl Fn(u32, &E) -> bool + Clone + Send + Sync {
        predicate::max_attempts(self.max_attempts)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub initial_weight: u32,
    pub min_weight: u32,
    pub max_weight: u32,
    pub strategy: StrategyConfig,
    pub retry: RetryPolicyConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_weight: DEFAULT_WEIGHT,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
            strategy: StrategyConfig::default(),
            retry: RetryPolicyConfig::default(),
        }
    }
}

impl PoolConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(Error::configuration_with_context(
                "unsupported configuration file extension",
                ErrorContext::new()
                    .with_field_path(path.to_string_lossy())
                    .with_details(format!("extension: {:?}", other))
                    .with_source("pool_config"),
            )),
        }
    }

    /// Starting weight for sources added without one.
    pub fn weight_item(&self) -> Result<WeightItem> {
        WeightItem::new(self.initial_weight, self.min_weight, self.max_weight).map_err(|e| {
            Error::configuration_with_context(
                e.to_string(),
                ErrorContext::new()
                    .with_field_path("initial_weight")
                    .with_source("pool_config"),
            )
        })
    }
}
