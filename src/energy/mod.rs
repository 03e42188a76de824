//! Energy model - pairwise matrices, full-system potentials and trial displacements.

mod displacement;
mod potentials;

pub use displacement::random_displacement;
pub use potentials::{
    coulomb_energy, distance_vector, lennard_jones_energy, lennard_jones_pair,
    pairwise_charge_product, pairwise_distance, spring_energy,
};

use nalgebra::SVector;

/// A particle coordinate in `D` dimensions.
pub type Point<const D: usize> = SVector<f64, D>;
