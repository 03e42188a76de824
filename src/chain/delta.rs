//! Incremental energy changes for a single-particle move.
//!
//! Moving particle `i` only changes row and column `i` of the distance matrix, so
//! each potential can be updated from the trial distance vector in O(N) (O(1) for
//! the springs) instead of re-summing all pairs. Entry `v[i]` of a trial vector is
//! the distance from the candidate to the particle's old position and never enters
//! a sum.

use nalgebra::DVector;

use super::state::AtomChain;
use crate::energy::{distance_vector, lennard_jones_pair, Point};

impl<const D: usize> AtomChain<D> {
    /// Distances from `candidate` to every current particle position.
    pub fn trial_distance_vector(&self, candidate: &Point<D>) -> DVector<f64> {
        distance_vector(&self.positions, candidate)
    }

    /// Move particle `i` to `new_position`, writing `trial` into row and column `i`.
    pub fn commit_move(&mut self, i: usize, new_position: Point<D>, trial: &DVector<f64>) {
        self.positions[i] = new_position;
        self.distance_matrix.set_row(i, &trial.transpose());
        self.distance_matrix.set_column(i, trial);
        self.distance_matrix[(i, i)] = 0.0;

        debug_assert!(
            (0..self.len()).all(|j| self.distance_matrix[(i, j)] == self.distance_matrix[(j, i)]),
            "distance matrix lost symmetry after moving particle {}",
            i
        );
    }

    /// Change in bond energy; only the bonds `(i-1, i)` and `(i, i+1)` exist.
    pub fn spring_delta(&self, i: usize, trial: &DVector<f64>) -> f64 {
        let rest = self.params.spring_len;
        let mut delta = 0.0;
        if i > 0 {
            delta += (trial[i - 1] - rest).powi(2) - (self.distance_matrix[(i - 1, i)] - rest).powi(2);
        }
        if i + 1 < self.len() {
            delta += (trial[i + 1] - rest).powi(2) - (self.distance_matrix[(i, i + 1)] - rest).powi(2);
        }
        delta * self.params.spring_const
    }

    pub fn coulomb_delta(&self, i: usize, trial: &DVector<f64>) -> f64 {
        (0..self.len())
            .filter(|&j| j != i)
            .map(|j| {
                let q = self.charge_matrix[(i, j)];
                q / trial[j] - q / self.distance_matrix[(i, j)]
            })
            .sum()
    }

    pub fn lennard_jones_delta(&self, i: usize, trial: &DVector<f64>) -> f64 {
        let radius = self.params.atom_radius;
        let sum: f64 = (0..self.len())
            .filter(|&j| j != i)
            .map(|j| lennard_jones_pair(radius, trial[j]) - lennard_jones_pair(radius, self.distance_matrix[(i, j)]))
            .sum();
        4.0 * self.params.epsilon * sum
    }
}
