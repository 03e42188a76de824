//! IO module - configuration loading for chain simulations.

mod config;

pub use config::{parse_config, read_config, ConfigError, SimulationConfig};
