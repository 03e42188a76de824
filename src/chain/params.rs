use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// Physical constants of a chain, fixed for its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    /// Harmonic bond stiffness `k`
    pub spring_const: f64,
    /// Bond rest length `L`
    pub spring_len: f64,
    /// Lennard-Jones length scale `σ`
    pub atom_radius: f64,
    /// Lennard-Jones well depth `ε`
    pub epsilon: f64,
    pub boltzmann_const: f64,
    pub temperature: f64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            spring_const: 1.0,
            spring_len: 1.0,
            atom_radius: 1.0,
            epsilon: 1.0,
            boltzmann_const: 1.0,
            temperature: 1.0,
        }
    }
}

impl ChainParams {
    /// `k_B T`, the denominator of the Boltzmann factor.
    pub fn thermal_energy(&self) -> f64 {
        self.boltzmann_const * self.temperature
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("spring_const", self.spring_const),
            ("spring_len", self.spring_len),
            ("atom_radius", self.atom_radius),
            ("epsilon", self.epsilon),
            ("boltzmann_const", self.boltzmann_const),
            ("temperature", self.temperature),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ChainError::InvalidParameter { name, value, reason: "must be finite" });
            }
        }

        let positive = [
            ("temperature", self.temperature),
            ("boltzmann_const", self.boltzmann_const),
            ("atom_radius", self.atom_radius),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ChainError::InvalidParameter { name, value, reason: "must be positive" });
            }
        }

        if self.spring_len < 0.0 {
            return Err(ChainError::InvalidParameter {
                name: "spring_len",
                value: self.spring_len,
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}
