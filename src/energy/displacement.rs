use rand::Rng;
use rand_distr::StandardNormal;

use super::Point;

/// Perturb `point` by an offset drawn uniformly from the `D`-ball of radius `max_radius`.
///
/// The direction comes from an isotropic Gaussian and the radius from `R * u^(1/D)`,
/// which gives a uniform density over the ball volume.
pub fn random_displacement<const D: usize, R: Rng + ?Sized>(
    point: &Point<D>,
    max_radius: f64,
    rng: &mut R,
) -> Point<D> {
    if D == 0 || max_radius <= 0.0 {
        return *point;
    }

    loop {
        let direction = Point::<D>::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal));
        let norm = direction.norm();
        if norm > 0.0 {
            let radius = max_radius * rng.gen::<f64>().powf(1.0 / D as f64);
            return point + direction * (radius / norm);
        }
    }
}
