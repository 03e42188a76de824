//! Sampling module - Metropolis drivers and statistics over atom chains.

mod ensemble;
mod metropolis;
mod stats;
mod traits;

pub use ensemble::run_ensemble;
pub use metropolis::{ChainSimulation, SamplingParams, SamplingResults};
pub use stats::{autocorrelation_time, blocking_error, mean};
pub use traits::MetropolisChain;
