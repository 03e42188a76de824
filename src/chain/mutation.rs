//! Single-particle Metropolis moves.
//!
//! A move is proposed (pure), then resolved against a uniform draw: accepted moves
//! are committed in place, rejected ones only record the attempted index.

use nalgebra::DVector;
use rand::Rng;
use tracing::{trace, warn};

use super::state::AtomChain;
use crate::energy::{random_displacement, Point};

/// Cap on `-ΔE / k_B T` so the Boltzmann factor saturates instead of overflowing.
pub const MAX_LOG_ACCEPTANCE: f64 = 700.0;

/// Metropolis acceptance probability `exp(-ΔE / k_B T)`.
///
/// Downhill moves give a value of at least one. Very large negative deltas
/// saturate at `exp(MAX_LOG_ACCEPTANCE)`, an infinite delta gives zero and a NaN
/// delta is treated as unacceptable.
pub fn acceptance_probability(energy_delta: f64, thermal_energy: f64) -> f64 {
    if energy_delta.is_nan() {
        return 0.0;
    }
    (-energy_delta / thermal_energy).min(MAX_LOG_ACCEPTANCE).exp()
}

#[inline]
pub fn metropolis_accept(probability: f64, uniform: f64) -> bool {
    uniform < probability
}

/// A proposed, not yet committed, move of one particle.
#[derive(Clone, Debug)]
pub struct TrialMove<const D: usize> {
    pub index: usize,
    pub candidate: Point<D>,
    pub distances: DVector<f64>,
    pub spring_delta: f64,
    pub lennard_delta: f64,
    pub coulomb_delta: f64,
    /// Particle the candidate would sit exactly on top of, if any.
    pub coincident_with: Option<usize>,
}

impl<const D: usize> TrialMove<D> {
    /// Total energy change; infinite when the candidate overlaps another particle.
    pub fn energy_delta(&self) -> f64 {
        if self.coincident_with.is_some() {
            f64::INFINITY
        } else {
            self.spring_delta + self.lennard_delta + self.coulomb_delta
        }
    }

    /// Distance between the candidate and the particle's current position.
    pub fn displacement(&self) -> f64 {
        self.distances[self.index]
    }
}

/// Outcome of one move with the quantities that decided it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub accepted: bool,
    pub uniform_draw: f64,
    pub acceptance_probability: f64,
    pub energy_before: f64,
    /// Energy of the proposed configuration, whether or not it was accepted.
    pub energy_after: f64,
    pub self_displacement: f64,
}

impl<const D: usize> AtomChain<D> {
    /// Evaluate moving particle `index` to `candidate` without changing the chain.
    pub fn propose_move(&self, index: usize, candidate: Point<D>) -> TrialMove<D> {
        let distances = self.trial_distance_vector(&candidate);
        let coincident_with = (0..self.len()).find(|&j| j != index && distances[j] == 0.0);

        let (spring_delta, lennard_delta, coulomb_delta) = match coincident_with {
            Some(_) => (0.0, 0.0, 0.0),
            None => (
                self.spring_delta(index, &distances),
                self.lennard_jones_delta(index, &distances),
                self.coulomb_delta(index, &distances),
            ),
        };

        TrialMove {
            index,
            candidate,
            distances,
            spring_delta,
            lennard_delta,
            coulomb_delta,
            coincident_with,
        }
    }

    /// Accept or reject `trial` against `uniform` in `[0, 1)` and apply it.
    pub fn resolve_move(&mut self, trial: TrialMove<D>, uniform: f64) -> MoveRecord {
        let energy_before = self.total_energy();
        let energy_delta = trial.energy_delta();
        let probability = acceptance_probability(energy_delta, self.params.thermal_energy());
        let finite = [trial.spring_delta, trial.lennard_delta, trial.coulomb_delta]
            .iter()
            .all(|d| d.is_finite());
        let accepted = finite && metropolis_accept(probability, uniform);

        if let Some(other) = trial.coincident_with {
            warn!(index = trial.index, other, "Rejected move onto an occupied position");
        }

        let record = MoveRecord {
            accepted,
            uniform_draw: uniform,
            acceptance_probability: probability,
            energy_before,
            energy_after: energy_before + energy_delta,
            self_displacement: trial.displacement(),
        };

        if accepted {
            self.spring += trial.spring_delta;
            self.lennard += trial.lennard_delta;
            self.coulomb += trial.coulomb_delta;
            self.commit_move(trial.index, trial.candidate, &trial.distances);
        }
        self.last_moved = Some(trial.index);

        trace!(index = trial.index, energy_delta, probability, accepted, "Metropolis move");
        record
    }

    /// One Metropolis step; returns whether the move was accepted.
    pub fn mutate<R: Rng + ?Sized>(&mut self, max_dist: f64, rng: &mut R) -> bool {
        self.diagnostic_mutate(max_dist, rng).accepted
    }

    /// Same transition as [`mutate`](Self::mutate), reporting how the decision was made.
    pub fn diagnostic_mutate<R: Rng + ?Sized>(&mut self, max_dist: f64, rng: &mut R) -> MoveRecord {
        debug_assert!(max_dist >= 0.0 && max_dist.is_finite(), "invalid move size {}", max_dist);

        let index = rng.gen_range(0..self.len());
        let candidate = random_displacement(&self.positions[index], max_dist, rng);
        let trial = self.propose_move(index, candidate);
        let uniform: f64 = rng.gen();
        self.resolve_move(trial, uniform)
    }
}
