//! Metropolis Monte Carlo driver for a single chain.
//!
//! Runs single-particle moves, adapts the move radius toward a target acceptance
//! rate and periodically cross-checks the incremental energies against a full
//! evaluation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::stats::{autocorrelation_time, blocking_error, mean};
use super::traits::MetropolisChain;
use crate::error::{ChainError, Result};

/// Parameters for a Metropolis run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub n_steps: usize,
    pub initial_max_dist: f64,
    pub min_max_dist: f64,
    pub max_max_dist: f64,
    pub target_acceptance: f64,
    /// Steps between move-size adaptations; 0 keeps the radius fixed
    pub adaptation_interval: usize,
    /// Steps between bookkeeping checks; 0 disables them
    pub verify_interval: usize,
    /// Relative tolerance for bookkeeping checks
    pub tolerance: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            n_steps: 100_000,
            initial_max_dist: 0.5,
            min_max_dist: 0.01,
            max_max_dist: 2.0,
            target_acceptance: 0.5,
            adaptation_interval: 1000,
            verify_interval: 10_000,
            tolerance: 1e-8,
        }
    }
}

impl SamplingParams {
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, value: f64, reason: &'static str| -> Result<()> {
            Err(ChainError::InvalidParameter { name, value, reason })
        };

        if !(self.min_max_dist >= 0.0 && self.min_max_dist.is_finite()) {
            return invalid("min_max_dist", self.min_max_dist, "must be finite and non-negative");
        }
        if !(self.max_max_dist >= self.min_max_dist && self.max_max_dist.is_finite()) {
            return invalid("max_max_dist", self.max_max_dist, "must be finite and at least min_max_dist");
        }
        if !(self.min_max_dist..=self.max_max_dist).contains(&self.initial_max_dist) {
            return invalid("initial_max_dist", self.initial_max_dist, "must lie within [min_max_dist, max_max_dist]");
        }
        if !(self.target_acceptance > 0.0 && self.target_acceptance < 1.0) {
            return invalid("target_acceptance", self.target_acceptance, "must lie in (0, 1)");
        }
        if !(self.tolerance > 0.0) {
            return invalid("tolerance", self.tolerance, "must be positive");
        }
        Ok(())
    }
}

/// Results of a Metropolis run.
#[derive(Clone, Debug)]
pub struct SamplingResults {
    pub mean_energy: f64,
    pub error: f64,
    pub autocorrelation_time: f64,
    pub acceptance_rate: f64,
    pub final_max_dist: f64,
    pub final_energy: f64,
    /// Total energy after every step
    pub energies: Vec<f64>,
}

/// Metropolis driver owning one chain and its random stream.
pub struct ChainSimulation<T: MetropolisChain> {
    chain: T,
    params: SamplingParams,
    rng: StdRng,
    max_dist: f64,
}

impl<T: MetropolisChain> ChainSimulation<T> {
    /// Seeded simulation; equal seeds replay identical trajectories.
    pub fn new(chain: T, params: SamplingParams, seed: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            chain,
            params,
            rng: StdRng::seed_from_u64(seed),
            max_dist: params.initial_max_dist,
        })
    }

    pub fn chain(&self) -> &T {
        &self.chain
    }

    pub fn into_chain(self) -> T {
        self.chain
    }

    pub fn max_dist(&self) -> f64 {
        self.max_dist
    }

    /// Run `n_steps` moves.
    pub fn run(&mut self) -> Result<SamplingResults> {
        let n_steps = self.params.n_steps;
        let mut energies = Vec::with_capacity(n_steps);
        let mut total_accepted = 0usize;
        let mut window_accepted = 0usize;

        info!(n_steps, max_dist = self.max_dist, "Starting Metropolis run");

        for step in 0..n_steps {
            if self.chain.step(self.max_dist, &mut self.rng) {
                total_accepted += 1;
                window_accepted += 1;
            }
            energies.push(self.chain.energy());

            let interval = self.params.adaptation_interval;
            if interval > 0 && (step + 1) % interval == 0 {
                self.adapt_step_size(window_accepted);
                window_accepted = 0;
            }

            let interval = self.params.verify_interval;
            if interval > 0 && (step + 1) % interval == 0 {
                self.chain.check(self.params.tolerance)?;
                self.chain.resync();
            }
        }

        let acceptance_rate = if n_steps == 0 {
            0.0
        } else {
            total_accepted as f64 / n_steps as f64
        };
        let results = self.compute_results(energies, acceptance_rate);
        info!(
            mean_energy = results.mean_energy,
            error = results.error,
            acceptance_rate,
            "Finished Metropolis run"
        );
        Ok(results)
    }

    /// Scale the move radius by `sqrt(rate / target)`, clamped to the configured range.
    fn adapt_step_size(&mut self, accepted: usize) {
        let acceptance_rate = accepted as f64 / self.params.adaptation_interval as f64;
        // Shrink by at most half per window
        let adjustment = (acceptance_rate / self.params.target_acceptance).sqrt().max(0.5);
        self.max_dist = (self.max_dist * adjustment)
            .clamp(self.params.min_max_dist, self.params.max_max_dist);
        debug!(acceptance_rate, max_dist = self.max_dist, "Adapted move size");
    }

    fn compute_results(&self, energies: Vec<f64>, acceptance_rate: f64) -> SamplingResults {
        let autocorrelation_time = autocorrelation_time(&energies);
        SamplingResults {
            mean_energy: mean(&energies),
            error: blocking_error(&energies, autocorrelation_time),
            autocorrelation_time,
            acceptance_rate,
            final_max_dist: self.max_dist,
            final_energy: self.chain.energy(),
            energies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AtomChain, ChainParams};
    use nalgebra::Vector3;

    fn chain() -> AtomChain<3> {
        let positions = (0..8).map(|i| Vector3::new(1.12 * i as f64, 0.0, 0.0)).collect();
        let charges = (0..8).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        AtomChain::build(positions, charges, ChainParams::default()).unwrap()
    }

    fn params(n_steps: usize) -> SamplingParams {
        SamplingParams {
            n_steps,
            adaptation_interval: 100,
            verify_interval: 500,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_keeps_bookkeeping_consistent() {
        let mut sim = ChainSimulation::new(chain(), params(5000), 1).unwrap();
        let results = sim.run().unwrap();
        assert_eq!(results.energies.len(), 5000);
        assert!(results.acceptance_rate > 0.0 && results.acceptance_rate <= 1.0);
        assert!(results.mean_energy.is_finite());
        assert!(sim.chain().verify(1e-8).is_ok());
    }

    #[test]
    fn test_adaptation_stays_in_bounds() {
        let p = SamplingParams { min_max_dist: 0.05, max_max_dist: 0.8, ..params(3000) };
        let mut sim = ChainSimulation::new(chain(), p, 2).unwrap();
        let results = sim.run().unwrap();
        assert!(results.final_max_dist >= 0.05 && results.final_max_dist <= 0.8);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let a = ChainSimulation::new(chain(), params(1000), 42).unwrap().run().unwrap();
        let b = ChainSimulation::new(chain(), params(1000), 42).unwrap().run().unwrap();
        assert_eq!(a.energies, b.energies);
        assert_eq!(a.final_max_dist, b.final_max_dist);
    }

    #[test]
    fn test_zero_steps() {
        let mut sim = ChainSimulation::new(chain(), params(0), 3).unwrap();
        let results = sim.run().unwrap();
        assert!(results.energies.is_empty());
        assert_eq!(results.acceptance_rate, 0.0);
        assert_eq!(results.final_energy, sim.chain().total_energy());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let p = SamplingParams { target_acceptance: 1.5, ..Default::default() };
        assert!(matches!(
            ChainSimulation::new(chain(), p, 0),
            Err(ChainError::InvalidParameter { name: "target_acceptance", .. })
        ));
        let p = SamplingParams { initial_max_dist: 5.0, ..Default::default() };
        assert!(p.validate().is_err());
    }
}
