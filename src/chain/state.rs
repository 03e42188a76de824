//! Chain state and lifecycle.
//!
//! A chain is either built from raw positions and charges (a full O(N²) pass
//! through the energy model) or restored from a snapshot of an already evaluated
//! chain. Bonding is implicit in the ordering: particle `i` is bonded to `i - 1`
//! and `i + 1` only, with open ends.

use approx::relative_eq;
use nalgebra::DMatrix;
use tracing::{debug, info};

use super::params::ChainParams;
use crate::energy::{
    coulomb_energy, lennard_jones_energy, pairwise_charge_product, pairwise_distance,
    spring_energy, Point,
};
use crate::error::{ChainError, Result};

/// Fully evaluated chain state, owned outright by whoever holds it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainSnapshot<const D: usize> {
    pub positions: Vec<Point<D>>,
    pub charges: Vec<f64>,
    pub distance_matrix: DMatrix<f64>,
    pub charge_matrix: DMatrix<f64>,
    pub spring: f64,
    pub lennard: f64,
    pub coulomb: f64,
}

/// How a chain gets its matrices and energies.
#[derive(Clone, Debug)]
pub enum ChainInit<const D: usize> {
    /// Evaluate everything from positions and charges.
    Build {
        positions: Vec<Point<D>>,
        charges: Vec<f64>,
    },
    /// Take a precomputed state verbatim.
    Restore(ChainSnapshot<D>),
}

/// Linear chain of charged particles with cached pair matrices and energies.
#[derive(Debug)]
pub struct AtomChain<const D: usize> {
    pub(super) positions: Vec<Point<D>>,
    pub(super) charges: Vec<f64>,
    pub(super) params: ChainParams,
    pub(super) distance_matrix: DMatrix<f64>,
    pub(super) charge_matrix: DMatrix<f64>,
    pub(super) spring: f64,
    pub(super) lennard: f64,
    pub(super) coulomb: f64,
    pub(super) last_moved: Option<usize>,
}

struct Energies {
    spring: f64,
    lennard: f64,
    coulomb: f64,
}

impl Energies {
    /// An infinite term can only be left by a later move as `inf - inf`.
    fn ensure_finite(&self) -> Result<()> {
        let terms = [("spring", self.spring), ("lennard", self.lennard), ("coulomb", self.coulomb)];
        match terms.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((term, value)) => Err(ChainError::NonFiniteEnergy { term, value }),
            None => Ok(()),
        }
    }
}

fn evaluate(dist: &DMatrix<f64>, charge: &DMatrix<f64>, params: &ChainParams) -> Energies {
    Energies {
        spring: spring_energy(dist, params.spring_len, params.spring_const),
        lennard: lennard_jones_energy(dist, params.atom_radius, params.epsilon),
        coulomb: coulomb_energy(dist, charge),
    }
}

fn validate_inputs<const D: usize>(
    positions: &[Point<D>],
    charges: &[f64],
    params: &ChainParams,
) -> Result<()> {
    params.validate()?;
    if positions.is_empty() {
        return Err(ChainError::EmptyChain);
    }
    if positions.len() != charges.len() {
        return Err(ChainError::LengthMismatch {
            positions: positions.len(),
            charges: charges.len(),
        });
    }
    if let Some(index) = positions.iter().position(|p| p.iter().any(|x| !x.is_finite())) {
        return Err(ChainError::NonFiniteInput { what: "position", index });
    }
    if let Some(index) = charges.iter().position(|q| !q.is_finite()) {
        return Err(ChainError::NonFiniteInput { what: "charge", index });
    }
    Ok(())
}

fn check_square(matrix: &'static str, m: &DMatrix<f64>, n: usize) -> Result<()> {
    if m.nrows() != n || m.ncols() != n {
        return Err(ChainError::DimensionMismatch {
            matrix,
            rows: m.nrows(),
            cols: m.ncols(),
            expected: n,
        });
    }
    Ok(())
}

impl<const D: usize> AtomChain<D> {
    pub fn new(params: ChainParams, init: ChainInit<D>) -> Result<Self> {
        match init {
            ChainInit::Build { positions, charges } => Self::build(positions, charges, params),
            ChainInit::Restore(snapshot) => Self::restore(snapshot, params),
        }
    }

    /// Build mode: evaluate both matrices and all three energies.
    pub fn build(positions: Vec<Point<D>>, charges: Vec<f64>, params: ChainParams) -> Result<Self> {
        validate_inputs(&positions, &charges, &params)?;

        let distance_matrix = pairwise_distance(&positions);
        let n = positions.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if distance_matrix[(i, j)] == 0.0 {
                    return Err(ChainError::CoincidentParticles { first: i, second: j });
                }
            }
        }

        let charge_matrix = pairwise_charge_product(&charges);
        let energies = evaluate(&distance_matrix, &charge_matrix, &params);
        energies.ensure_finite()?;
        info!(
            n_particles = n,
            spring = energies.spring,
            lennard = energies.lennard,
            coulomb = energies.coulomb,
            "Built atom chain"
        );

        Ok(Self {
            positions,
            charges,
            params,
            distance_matrix,
            charge_matrix,
            spring: energies.spring,
            lennard: energies.lennard,
            coulomb: energies.coulomb,
            last_moved: None,
        })
    }

    /// Restore mode: adopt a precomputed state without touching the energy model.
    pub fn restore(snapshot: ChainSnapshot<D>, params: ChainParams) -> Result<Self> {
        validate_inputs(&snapshot.positions, &snapshot.charges, &params)?;
        let n = snapshot.positions.len();
        check_square("distance", &snapshot.distance_matrix, n)?;
        check_square("charge", &snapshot.charge_matrix, n)?;
        Energies {
            spring: snapshot.spring,
            lennard: snapshot.lennard,
            coulomb: snapshot.coulomb,
        }
        .ensure_finite()?;
        for i in 0..n {
            for j in (i + 1)..n {
                if !(snapshot.distance_matrix[(i, j)] > 0.0 && snapshot.distance_matrix[(i, j)].is_finite()) {
                    return Err(ChainError::InvariantViolation {
                        row: i,
                        col: j,
                        message: "distance must be positive and finite",
                    });
                }
            }
        }
        Ok(Self::from_snapshot(snapshot, params))
    }

    fn from_snapshot(snapshot: ChainSnapshot<D>, params: ChainParams) -> Self {
        Self {
            positions: snapshot.positions,
            charges: snapshot.charges,
            params,
            distance_matrix: snapshot.distance_matrix,
            charge_matrix: snapshot.charge_matrix,
            spring: snapshot.spring,
            lennard: snapshot.lennard,
            coulomb: snapshot.coulomb,
            last_moved: None,
        }
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> ChainSnapshot<D> {
        ChainSnapshot {
            positions: self.positions.clone(),
            charges: self.charges.clone(),
            distance_matrix: self.distance_matrix.clone(),
            charge_matrix: self.charge_matrix.clone(),
            spring: self.spring,
            lennard: self.lennard,
            coulomb: self.coulomb,
        }
    }

    /// Independent chain with the same state; the last-moved index is not carried over.
    pub fn copy(&self) -> Self {
        Self::from_snapshot(self.snapshot(), self.params)
    }

    /// Rebuild matrices and energies from the current positions and charges.
    pub fn recompute(&mut self) {
        let before = self.total_energy();
        self.distance_matrix = pairwise_distance(&self.positions);
        self.charge_matrix = pairwise_charge_product(&self.charges);
        let energies = evaluate(&self.distance_matrix, &self.charge_matrix, &self.params);
        self.spring = energies.spring;
        self.lennard = energies.lennard;
        self.coulomb = energies.coulomb;
        debug!(drift = self.total_energy() - before, "Recomputed chain energies");
    }

    /// Compare the cached state against a fresh evaluation without modifying it.
    pub fn verify(&self, max_relative: f64) -> Result<()> {
        let n = self.len();
        for i in 0..n {
            if self.distance_matrix[(i, i)] != 0.0 {
                return Err(ChainError::InvariantViolation { row: i, col: i, message: "non-zero diagonal" });
            }
            for j in (i + 1)..n {
                if self.distance_matrix[(i, j)] != self.distance_matrix[(j, i)] {
                    return Err(ChainError::InvariantViolation { row: i, col: j, message: "asymmetric entry" });
                }
            }
        }

        let fresh = pairwise_distance(&self.positions);
        let energies = evaluate(&fresh, &self.charge_matrix, &self.params);
        let terms = [
            ("spring", self.spring, energies.spring),
            ("lennard", self.lennard, energies.lennard),
            ("coulomb", self.coulomb, energies.coulomb),
        ];
        for (term, incremental, recomputed) in terms {
            // Absolute floor for terms that sit near zero
            if !relative_eq!(incremental, recomputed, epsilon = 1e-9, max_relative = max_relative) {
                return Err(ChainError::EnergyDrift { term, incremental, recomputed });
            }
        }
        debug!(total = self.total_energy(), "Chain energies verified");
        Ok(())
    }

    pub fn positions(&self) -> &[Point<D>] {
        &self.positions
    }

    pub fn charges(&self) -> &[f64] {
        &self.charges
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn distance_matrix(&self) -> &DMatrix<f64> {
        &self.distance_matrix
    }

    pub fn charge_matrix(&self) -> &DMatrix<f64> {
        &self.charge_matrix
    }

    pub fn spring_energy(&self) -> f64 {
        self.spring
    }

    pub fn lennard_energy(&self) -> f64 {
        self.lennard
    }

    pub fn coulomb_energy(&self) -> f64 {
        self.coulomb
    }

    pub fn total_energy(&self) -> f64 {
        self.spring + self.lennard + self.coulomb
    }

    /// Index targeted by the most recent mutation attempt, accepted or not.
    pub fn last_moved_index(&self) -> Option<usize> {
        self.last_moved
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
