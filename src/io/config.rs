//! YAML configuration for a chain simulation.
//!
//! ```yaml
//! chain:
//!   spring_const: 1.0
//!   spring_len: 1.0
//!   temperature: 0.5
//! positions:
//!   - [0.0, 0.0]
//!   - [1.0, 0.0]
//!   - [2.0, 0.0]
//! charges: [1.0, -1.0, 1.0]
//! sampling:
//!   n_steps: 100000
//!   initial_max_dist: 0.3
//! seed: 42
//! n_chains: 4
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::ChainParams;
use crate::energy::Point;
use crate::sampling::SamplingParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("n_chains must be at least 1")]
    NoChains,

    #[error("Config lists no positions")]
    NoPositions,

    #[error("Unsupported dimension {0}")]
    UnsupportedDimension(usize),

    #[error("Position {index} has {found} coordinates, expected {expected}")]
    InconsistentDimension {
        index: usize,
        expected: usize,
        found: usize,
    },
}

fn default_n_chains() -> usize {
    1
}

/// Everything needed to build a chain and sample it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub chain: ChainParams,
    pub positions: Vec<Vec<f64>>,
    pub charges: Vec<f64>,
    #[serde(default)]
    pub sampling: SamplingParams,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_n_chains")]
    pub n_chains: usize,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_chains == 0 {
            return Err(ConfigError::NoChains);
        }
        self.dimension().map(|_| ())
    }

    /// Number of coordinates per position, shared by all positions.
    pub fn dimension(&self) -> Result<usize, ConfigError> {
        let expected = self.positions.first().ok_or(ConfigError::NoPositions)?.len();
        for (index, p) in self.positions.iter().enumerate() {
            if p.len() != expected {
                return Err(ConfigError::InconsistentDimension { index, expected, found: p.len() });
            }
        }
        Ok(expected)
    }

    /// Positions as `D`-dimensional points.
    pub fn points<const D: usize>(&self) -> Result<Vec<Point<D>>, ConfigError> {
        self.positions
            .iter()
            .enumerate()
            .map(|(index, p)| {
                if p.len() != D {
                    return Err(ConfigError::InconsistentDimension { index, expected: D, found: p.len() });
                }
                Ok(Point::<D>::from_column_slice(p))
            })
            .collect()
    }
}

pub fn parse_config(text: &str) -> Result<SimulationConfig, ConfigError> {
    let config: SimulationConfig = serde_yaml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

pub fn read_config(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);
    let config: SimulationConfig = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
