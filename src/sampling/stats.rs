//! Statistics over correlated Monte Carlo energy traces.

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Mean and population variance of a trace with at least two samples.
struct Moments {
    mean: f64,
    variance: f64,
}

impl Moments {
    fn of(samples: &[f64]) -> Option<Self> {
        if samples.len() < 2 {
            return None;
        }
        let mean = mean(samples);
        let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        Some(Self { mean, variance })
    }
}

/// Covariance between the trace and itself shifted by `lag`.
fn autocovariance(samples: &[f64], mean: f64, lag: usize) -> f64 {
    let overlap = samples.len() - lag;
    samples[..overlap]
        .iter()
        .zip(&samples[lag..])
        .map(|(&x, &y)| (x - mean) * (y - mean))
        .sum::<f64>()
        / overlap as f64
}

/// Integrated autocorrelation time `1 + 2 Σ ρ(t)`, summed until `ρ` first turns negative.
pub fn autocorrelation_time(samples: &[f64]) -> f64 {
    let Some(moments) = Moments::of(samples).filter(|m| m.variance > 0.0) else {
        return 1.0;
    };
    let positive_sum: f64 = (1..samples.len() / 2)
        .map(|lag| autocovariance(samples, moments.mean, lag) / moments.variance)
        .take_while(|&rho| rho >= 0.0)
        .sum();
    1.0 + 2.0 * positive_sum
}

/// Standard error of the mean from blocks of `ceil(2 τ)` samples.
pub fn blocking_error(samples: &[f64], autocorrelation_time: f64) -> f64 {
    let block_size = ((2.0 * autocorrelation_time).ceil() as usize).max(1);
    let block_means: Vec<f64> = samples.chunks_exact(block_size).map(mean).collect();

    // Population variance over (n - 1) is the unbiased variance of the mean
    Moments::of(&block_means)
        .map(|m| (m.variance / (block_means.len() - 1) as f64).sqrt())
        .unwrap_or(0.0)
}
