//! Error types for chain construction and bookkeeping checks.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    #[error("A chain needs at least one particle")]
    EmptyChain,

    #[error("Got {positions} positions but {charges} charges")]
    LengthMismatch { positions: usize, charges: usize },

    #[error("Non-finite {what} for particle {index}")]
    NonFiniteInput { what: &'static str, index: usize },

    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Particles {first} and {second} occupy the same position")]
    CoincidentParticles { first: usize, second: usize },

    #[error("{term} energy is not finite ({value}); particles are too close")]
    NonFiniteEnergy { term: &'static str, value: f64 },

    #[error("{matrix} matrix is {rows}x{cols}, expected {expected}x{expected}")]
    DimensionMismatch {
        matrix: &'static str,
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("Distance matrix invariant broken at ({row}, {col}): {message}")]
    InvariantViolation {
        row: usize,
        col: usize,
        message: &'static str,
    },

    #[error("{term} energy drifted: incremental {incremental}, recomputed {recomputed}")]
    EnergyDrift {
        term: &'static str,
        incremental: f64,
        recomputed: f64,
    },
}

pub type Result<T> = std::result::Result<T, ChainError>;
