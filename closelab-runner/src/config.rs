//! Sweep configuration loaded from TOML.
//!
//! ```toml
//! [sweep]
//! strategy = "mean_reversion"
//! partitions = [1, 2, 3]
//! top_k = 10
//!
//! [sweep.windows]
//! start = 1
//! stop = 10
//!
//! [sweep.diffs]
//! values = [-1.0, 0.0, 1.0]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use closelab_core::StrategyKind;

use crate::error::SweepError;
use crate::grid::{float_range, int_range, ParamGrid};
use crate::partition::PartitionSpec;

/// Unique identifier for a sweep configuration (content-addressable hash).
pub type RunId = String;

/// Errors from reading a sweep configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<SweepError> for ConfigError {
    fn from(err: SweepError) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}

/// Window sizes: explicit list or `[start, stop)` with a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowRange {
    Values {
        values: Vec<i64>,
    },
    Stepped {
        start: i64,
        stop: i64,
        #[serde(default = "default_int_step")]
        step: i64,
    },
}

impl WindowRange {
    pub fn resolve(&self) -> Result<Vec<usize>, ConfigError> {
        match self {
            Self::Values { values } => values.iter().map(|&v| non_negative("window", v)).collect(),
            Self::Stepped { start, stop, step } => {
                let start = non_negative("window start", *start)?;
                let stop = non_negative("window stop", *stop)?;
                let step = non_negative("window step", *step)?;
                Ok(int_range(start, stop, step)?)
            }
        }
    }
}

impl Default for WindowRange {
    fn default() -> Self {
        Self::Stepped {
            start: 1,
            stop: 10,
            step: 1,
        }
    }
}

/// Band widths in percent: explicit list or `[start, stop)` with a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffRange {
    Values {
        values: Vec<f64>,
    },
    Stepped {
        start: f64,
        stop: f64,
        #[serde(default = "default_float_step")]
        step: f64,
    },
}

impl DiffRange {
    pub fn resolve(&self) -> Result<Vec<f64>, ConfigError> {
        match self {
            Self::Values { values } => Ok(values.clone()),
            Self::Stepped { start, stop, step } => Ok(float_range(*start, *stop, *step)?),
        }
    }
}

impl Default for DiffRange {
    fn default() -> Self {
        Self::Stepped {
            start: -10.0,
            stop: 10.0,
            step: 1.0,
        }
    }
}

/// Partition counts as written in the file: one integer or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartitionInput {
    Single(i64),
    Multiple(Vec<i64>),
}

impl PartitionInput {
    pub fn resolve(&self) -> Result<PartitionSpec, ConfigError> {
        match self {
            Self::Single(count) => Ok(PartitionSpec::Single(non_negative("partitions", *count)?)),
            Self::Multiple(counts) => {
                if counts.is_empty() {
                    return Err(ConfigError::InvalidParameter(
                        "partition list is empty".to_string(),
                    ));
                }
                counts
                    .iter()
                    .map(|&c| non_negative("partitions", c))
                    .collect::<Result<Vec<_>, _>>()
                    .map(PartitionSpec::Multiple)
            }
        }
    }
}

impl Default for PartitionInput {
    fn default() -> Self {
        Self::Single(0)
    }
}

/// Everything needed to reproduce a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub strategy: StrategyKind,
    pub windows: WindowRange,
    pub diffs: DiffRange,
    pub partitions: PartitionInput,
    /// `-1` returns every combination.
    pub top_k: i64,
    pub allow_short: bool,
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::MeanReversion,
            windows: WindowRange::default(),
            diffs: DiffRange::default(),
            partitions: PartitionInput::default(),
            top_k: 5,
            allow_short: false,
            parallel: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    sweep: SweepConfig,
}

impl SweepConfig {
    /// Load from a TOML file with a `[sweep]` table.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.sweep.validate()?;
        Ok(file.sweep)
    }

    /// Check every field resolves; does not run anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?.validate()?;
        self.partition_spec()?;
        if self.top_k < -1 {
            return Err(ConfigError::InvalidParameter(format!(
                "top_k must be -1 or non-negative, got {}",
                self.top_k
            )));
        }
        if self.allow_short && !self.strategy.supports_short_selling() {
            return Err(ConfigError::InvalidParameter(format!(
                "{} does not support short selling",
                self.strategy
            )));
        }
        Ok(())
    }

    pub fn grid(&self) -> Result<ParamGrid, ConfigError> {
        Ok(ParamGrid::new(self.windows.resolve()?, self.diffs.resolve()?))
    }

    pub fn partition_spec(&self) -> Result<PartitionSpec, ConfigError> {
        self.partitions.resolve()
    }

    /// Computes a deterministic hash ID for this configuration.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)?;
        let hash = blake3::hash(json.as_bytes());
        Ok(hash.to_hex().to_string())
    }
}

fn default_int_step() -> i64 {
    1
}

fn default_float_step() -> f64 {
    1.0
}

fn non_negative(what: &str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .map_err(|_| ConfigError::InvalidParameter(format!("{what} must be >= 0, got {value}")))
}
