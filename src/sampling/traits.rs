//! Traits for Metropolis sampling drivers.

use rand::Rng;

use crate::chain::AtomChain;
use crate::error::Result;

/// A configuration that can be advanced one Metropolis move at a time.
pub trait MetropolisChain: Sized {
    /// Attempt one move; returns whether it was accepted.
    fn step<R: Rng + ?Sized>(&mut self, max_dist: f64, rng: &mut R) -> bool;
    /// Current total energy
    fn energy(&self) -> f64;
    /// Check the incremental bookkeeping against a full evaluation.
    fn check(&self, tolerance: f64) -> Result<()>;
    /// Discard accumulated rounding by re-evaluating from scratch.
    fn resync(&mut self);
    /// Independent copy sharing no mutable state.
    fn fork(&self) -> Self;
}

impl<const D: usize> MetropolisChain for AtomChain<D> {
    fn step<R: Rng + ?Sized>(&mut self, max_dist: f64, rng: &mut R) -> bool {
        self.mutate(max_dist, rng)
    }

    fn energy(&self) -> f64 {
        self.total_energy()
    }

    fn check(&self, tolerance: f64) -> Result<()> {
        self.verify(tolerance)
    }

    fn resync(&mut self) {
        self.recompute()
    }

    fn fork(&self) -> Self {
        self.copy()
    }
}
