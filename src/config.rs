//! Solver configuration, loadable from TOML.
//!
//! ```toml
//! strategy = "sat"
//! time_limit_ms = 60000
//! edge_order = "tightest_first"
//! refinement = "cut_component"
//! ```
//!
//! Every key is optional.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::solver::{EdgeOrder, Refinement, StrategyKind};

/// Problems reading a [`SolverConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not TOML, or an unknown value.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which strategy to run, for how long, and how it should explore.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Strategy to run; backtracking unless set.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Wall-clock budget in milliseconds; absent means unlimited.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,

    /// Edge order for backtracking and best-first search.
    #[serde(default)]
    pub edge_order: EdgeOrder,

    /// Refinement clause for the SAT strategy.
    #[serde(default)]
    pub refinement: Refinement,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file at `path`.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::Invalid("time_limit_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// The configured budget, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the time limit, truncated to whole milliseconds.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit_ms = Some(time_limit.as_millis() as u64);
        self
    }

    /// Sets the edge order.
    pub fn with_edge_order(mut self, edge_order: EdgeOrder) -> Self {
        self.edge_order = edge_order;
        self
    }

    /// Sets the SAT refinement.
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = refinement;
        self
    }
}
