//! Rust Atom Chain - Metropolis Monte Carlo for charged bead-spring chains
//!
//! This crate samples equilibrium configurations of a linear chain of charged
//! particles joined by harmonic springs and interacting through Lennard-Jones and
//! Coulomb potentials. Single-particle moves update the energy incrementally in
//! O(N) per step.

pub mod chain;
pub mod energy;
pub mod error;
pub mod io;
pub mod sampling;

// Re-export commonly used types at crate root
pub use chain::{AtomChain, ChainInit, ChainParams, ChainSnapshot, MoveRecord, TrialMove};
pub use energy::{random_displacement, Point};
pub use error::ChainError;
pub use io::{parse_config, read_config, ConfigError, SimulationConfig};
pub use sampling::{run_ensemble, ChainSimulation, MetropolisChain, SamplingParams, SamplingResults};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::chain::{AtomChain, ChainInit, ChainParams};
    use crate::energy::Point;

    fn helix(n: usize) -> AtomChain<3> {
        let positions: Vec<Point<3>> = (0..n)
            .map(|i| {
                let t = i as f64 * 0.9;
                Vector3::new(1.5 * t.cos(), 1.5 * t.sin(), 0.45 * i as f64)
            })
            .collect();
        let charges = (0..n).map(|i| [1.0, -0.5, 0.25][i % 3]).collect();
        let params = ChainParams {
            spring_const: 5.0,
            spring_len: 1.2,
            atom_radius: 0.9,
            epsilon: 0.8,
            boltzmann_const: 1.0,
            temperature: 2.0,
        };
        AtomChain::build(positions, charges, params).unwrap()
    }

    #[test]
    fn test_incremental_energy_matches_full_recompute() {
        let mut chain = helix(12);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut accepted = 0;

        for _ in 0..2000 {
            if chain.mutate(0.3, &mut rng) {
                accepted += 1;
            }
        }
        assert!(accepted > 0);

        let incremental = (chain.spring_energy(), chain.lennard_energy(), chain.coulomb_energy(), chain.total_energy());
        chain.recompute();
        assert_relative_eq!(incremental.0, chain.spring_energy(), epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(incremental.1, chain.lennard_energy(), epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(incremental.2, chain.coulomb_energy(), epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(incremental.3, chain.total_energy(), epsilon = 1e-9, max_relative = 1e-9);
    }

    #[test]
    fn test_every_accepted_move_is_consistent() {
        let mut chain = helix(8);
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..300 {
            let record = chain.diagnostic_mutate(0.25, &mut rng);
            if record.accepted {
                let mut fresh = chain.copy();
                fresh.recompute();
                assert_relative_eq!(chain.total_energy(), fresh.total_energy(), epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_distance_matrix_stays_symmetric() {
        let mut chain = helix(10);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..1000 {
            chain.mutate(0.4, &mut rng);
            let d = chain.distance_matrix();
            for a in 0..chain.len() {
                assert_eq!(d[(a, a)], 0.0);
                for b in (a + 1)..chain.len() {
                    assert_eq!(d[(a, b)], d[(b, a)]);
                }
            }
        }
        // And still consistent with the positions
        let fresh = crate::energy::pairwise_distance(chain.positions());
        assert!((chain.distance_matrix() - fresh).amax() < 1e-12);
    }

    #[test]
    fn test_charge_matrix_never_changes() {
        let mut chain = helix(6);
        let charges = chain.charge_matrix().clone();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            chain.mutate(0.5, &mut rng);
        }
        assert_eq!(chain.charge_matrix(), &charges);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut source = helix(6);
        let mut rng = StdRng::seed_from_u64(99);
        source.mutate(0.3, &mut rng);
        assert!(source.last_moved_index().is_some());

        let mut fork = source.copy();
        assert_eq!(fork.last_moved_index(), None);
        assert_eq!(fork.snapshot(), source.snapshot());

        let source_before = source.snapshot();
        for _ in 0..200 {
            fork.mutate(0.5, &mut rng);
        }
        assert_eq!(source.snapshot(), source_before);

        let fork_before = fork.snapshot();
        for _ in 0..200 {
            source.mutate(0.5, &mut rng);
        }
        assert_eq!(fork.snapshot(), fork_before);
    }

    #[test]
    fn test_restore_roundtrip_through_init() {
        let chain = helix(5);
        let restored = AtomChain::new(*chain.params(), ChainInit::Restore(chain.snapshot())).unwrap();
        assert_eq!(restored.snapshot(), chain.snapshot());

        let rebuilt = AtomChain::new(
            *chain.params(),
            ChainInit::Build { positions: chain.positions().to_vec(), charges: chain.charges().to_vec() },
        )
        .unwrap();
        assert_relative_eq!(rebuilt.total_energy(), chain.total_energy(), epsilon = 1e-12);
    }

    #[test]
    fn test_two_dimensional_chain_samples() {
        let positions = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(2.0, 0.0)];
        let mut chain = AtomChain::build(positions, vec![1.0, 1.0, 1.0], ChainParams::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            chain.mutate(0.2, &mut rng);
        }
        assert!(chain.verify(1e-9).is_ok());
    }
}
