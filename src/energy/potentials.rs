//! Full-system potentials for a linear chain of charged particles.
//!
//! All sums run over the upper triangle of the distance matrix, except the
//! spring term which only sees bonded neighbours `(i, i+1)`.

use nalgebra::{DMatrix, DVector};

use super::Point;

/// Euclidean distance between every pair of particles.
/// The result is symmetric with a zero diagonal.
pub fn pairwise_distance<const D: usize>(positions: &[Point<D>]) -> DMatrix<f64> {
    let n = positions.len();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            0.0
        } else {
            (positions[i] - positions[j]).norm()
        }
    })
}

/// Outer product of the charge vector, `q[i][j] = q_i * q_j`.
pub fn pairwise_charge_product(charges: &[f64]) -> DMatrix<f64> {
    let n = charges.len();
    DMatrix::from_fn(n, n, |i, j| charges[i] * charges[j])
}

/// Distances from `point` to every particle in `positions`.
pub fn distance_vector<const D: usize>(positions: &[Point<D>], point: &Point<D>) -> DVector<f64> {
    DVector::from_iterator(positions.len(), positions.iter().map(|p| (p - point).norm()))
}

/// Harmonic bond energy `k * Σ (d[i][i+1] - L)²`.
pub fn spring_energy(dist: &DMatrix<f64>, rest_len: f64, spring_const: f64) -> f64 {
    let n = dist.nrows();
    let sum: f64 = (1..n)
        .map(|i| (dist[(i - 1, i)] - rest_len).powi(2))
        .sum();
    spring_const * sum
}

/// Reduced Lennard-Jones pair term `(σ/d)^12 - (σ/d)^6`, without the `4ε` prefactor.
#[inline]
pub fn lennard_jones_pair(radius: f64, distance: f64) -> f64 {
    let s6 = (radius / distance).powi(6);
    s6 * s6 - s6
}

/// Lennard-Jones energy `4ε Σ_{i<j} ((σ/d)^12 - (σ/d)^6)`.
pub fn lennard_jones_energy(dist: &DMatrix<f64>, radius: f64, epsilon: f64) -> f64 {
    let n = dist.nrows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += lennard_jones_pair(radius, dist[(i, j)]);
        }
    }
    4.0 * epsilon * sum
}

/// Coulomb energy `Σ_{i<j} q_ij / d_ij` in reduced units.
pub fn coulomb_energy(dist: &DMatrix<f64>, charges: &DMatrix<f64>) -> f64 {
    let n = dist.nrows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += charges[(i, j)] / dist[(i, j)];
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn line() -> Vec<Point<2>> {
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(2.0, 0.0),
        ]
    }

    #[test]
    fn test_pairwise_distance_symmetric() {
        let positions = vec![
            Vector2::new(0.3, -1.2),
            Vector2::new(2.5, 0.7),
            Vector2::new(-1.1, 4.0),
            Vector2::new(0.0, 0.0),
        ];
        let d = pairwise_distance(&positions);
        for i in 0..4 {
            assert_eq!(d[(i, i)], 0.0);
            for j in 0..4 {
                assert_eq!(d[(i, j)], d[(j, i)]);
            }
        }
        assert_relative_eq!(d[(0, 3)], (0.3f64 * 0.3 + 1.2 * 1.2).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_distance_vector_matches_matrix_row() {
        let positions = line();
        let d = pairwise_distance(&positions);
        let v = distance_vector(&positions, &positions[1]);
        for j in 0..3 {
            assert_eq!(v[j], d[(1, j)]);
        }
    }

    #[test]
    fn test_charge_product() {
        let q = pairwise_charge_product(&[1.0, -2.0, 0.5]);
        assert_eq!(q[(0, 1)], -2.0);
        assert_eq!(q[(1, 2)], -1.0);
        assert_eq!(q[(2, 0)], 0.5);
    }

    #[test]
    fn test_three_particle_line_energies() {
        let d = pairwise_distance(&line());
        let q = pairwise_charge_product(&[1.0, 1.0, 1.0]);

        assert_relative_eq!(spring_energy(&d, 1.0, 1.0), 0.0);
        // Two pairs at the LJ zero crossing, one at d = 2
        assert_relative_eq!(lennard_jones_energy(&d, 1.0, 1.0), -252.0 / 4096.0, epsilon = 1e-14);
        assert_relative_eq!(coulomb_energy(&d, &q), 2.5, epsilon = 1e-14);
    }

    #[test]
    fn test_spring_only_counts_bonded_pairs() {
        let positions = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 3.0),
        ];
        let d = pairwise_distance(&positions);
        // Bonds of length 2 and 3, rest length 1: 1 + 4
        assert_relative_eq!(spring_energy(&d, 1.0, 2.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lennard_jones_minimum() {
        let r_min = 2f64.powf(1.0 / 6.0);
        assert_relative_eq!(lennard_jones_pair(1.0, r_min), -0.25, epsilon = 1e-12);
    }
}
