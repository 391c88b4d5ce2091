//! Poisson count sampling for simulated detector readings.
//!
//! Small expected counts use Knuth's multiplicative method, which is exact but
//! costs one uniform draw per count. Above the configured threshold the
//! normal approximation `round(λ + √λ·z)` is used, with `z` from Box–Muller.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::prelude::{ModelError, ModelResult};

/// Expected count above which the Gaussian approximation takes over.
pub const DEFAULT_GAUSSIAN_THRESHOLD: f64 = 60.0;

/// Smallest first uniform fed to Box–Muller, keeps `ln(u1)` finite.
const MIN_UNIFORM: f64 = 1e-9;

/// Which algorithm produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingRegime {
    /// No draw was made: λ was zero, negative or non-finite.
    Degenerate,
    Exact,
    Gaussian,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub gaussian_threshold: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            gaussian_threshold: DEFAULT_GAUSSIAN_THRESHOLD,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if !self.gaussian_threshold.is_finite() {
            return Err(ModelError::NonFinite("gaussian_threshold".into()));
        }
        if self.gaussian_threshold < 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "gaussian_threshold must be non-negative, got {}",
                self.gaussian_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonSampler {
    config: SamplerConfig,
}

impl PoissonSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn regime_for(&self, lambda: f64) -> SamplingRegime {
        if !lambda.is_finite() || lambda <= 0.0 {
            SamplingRegime::Degenerate
        } else if lambda > self.config.gaussian_threshold {
            SamplingRegime::Gaussian
        } else {
            SamplingRegime::Exact
        }
    }

    pub fn sample<R: Rng>(&self, lambda: f64, rng: &mut R) -> u64 {
        self.sample_with_regime(lambda, rng).0
    }

    pub fn sample_with_regime<R: Rng>(
        &self,
        lambda: f64,
        rng: &mut R,
    ) -> (u64, SamplingRegime) {
        let regime = self.regime_for(lambda);
        let count = match regime {
            SamplingRegime::Degenerate => 0,
            SamplingRegime::Exact => knuth(lambda, rng),
            SamplingRegime::Gaussian => normal_approximation(lambda, rng),
        };
        (count, regime)
    }
}

/// Knuth's method compared in log space: `Σ ln u ≤ −λ` is `Π u ≤ e^(−λ)`
/// without `e^(−λ)` underflowing for large λ.
fn knuth<R: Rng>(lambda: f64, rng: &mut R) -> u64 {
    let limit = -lambda;
    let mut k: u64 = 0;
    let mut log_product = 0.0_f64;
    loop {
        k += 1;
        log_product += rng.gen::<f64>().ln();
        if log_product <= limit {
            break;
        }
    }
    k - 1
}

fn normal_approximation<R: Rng>(lambda: f64, rng: &mut R) -> u64 {
    let z = standard_normal(rng);
    let value = (lambda + lambda.sqrt() * z).round();
    if value <= 0.0 {
        0
    } else {
        value as u64
    }
}

/// Box–Muller transform, cosine branch.
pub fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1 = rng.gen::<f64>().max(MIN_UNIFORM);
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::stats::StatsHelper;
    use rand::{rngs::StdRng, SeedableRng};

    fn draw(lambda: f64, trials: usize, seed: u64) -> Vec<u64> {
        let sampler = PoissonSampler::default();
        let mut rng = StdRng::seed_from_u64(seed);
        (0..trials).map(|_| sampler.sample(lambda, &mut rng)).collect()
    }

    #[test]
    fn non_positive_lambda_yields_zero() {
        let sampler = PoissonSampler::default();
        let mut rng = StdRng::seed_from_u64(1);
        for lambda in [0.0, -1.0, -250.0, f64::NAN, f64::NEG_INFINITY] {
            assert_eq!(
                sampler.sample_with_regime(lambda, &mut rng),
                (0, SamplingRegime::Degenerate)
            );
        }
    }

    #[test]
    fn regime_switches_above_threshold() {
        let sampler = PoissonSampler::default();
        assert_eq!(sampler.regime_for(60.0), SamplingRegime::Exact);
        assert_eq!(sampler.regime_for(60.5), SamplingRegime::Gaussian);

        let custom = PoissonSampler::new(SamplerConfig {
            gaussian_threshold: 10.0,
        });
        assert_eq!(custom.regime_for(11.0), SamplingRegime::Gaussian);
    }

    #[test]
    fn small_mean_matches_poisson_moments() {
        let counts = draw(5.0, 20_000, 7);
        let (mean, variance) = StatsHelper::count_summary(&counts);
        assert!((mean - 5.0).abs() < 0.15, "mean {}", mean);
        assert!((variance - 5.0).abs() < 0.5, "variance {}", variance);
    }

    #[test]
    fn large_mean_matches_poisson_moments() {
        let counts = draw(1000.0, 20_000, 11);
        let (mean, variance) = StatsHelper::count_summary(&counts);
        assert!((mean - 1000.0).abs() < 2.0, "mean {}", mean);
        assert!((variance - 1000.0).abs() < 80.0, "variance {}", variance);
    }

    #[test]
    fn tiny_mean_is_mostly_zero() {
        let counts = draw(0.01, 1_000, 3);
        let zeros = counts.iter().filter(|&&n| n == 0).count();
        assert!(zeros > 950);
    }

    #[test]
    fn exact_path_stays_unbiased_past_exp_underflow() {
        // e^(-2000) is 0 in f64; the exact path must still centre on λ
        let sampler = PoissonSampler::new(SamplerConfig {
            gaussian_threshold: 1e6,
        });
        let mut rng = StdRng::seed_from_u64(19);
        let counts: Vec<u64> = (0..500)
            .map(|_| {
                let (n, regime) = sampler.sample_with_regime(2000.0, &mut rng);
                assert_eq!(regime, SamplingRegime::Exact);
                n
            })
            .collect();
        let (mean, variance) = StatsHelper::count_summary(&counts);
        assert!((mean - 2000.0).abs() < 12.0, "mean {}", mean);
        assert!((variance - 2000.0).abs() < 600.0, "variance {}", variance);
    }

    #[test]
    fn negative_threshold_rejected() {
        let config = SamplerConfig {
            gaussian_threshold: -1.0,
        };
        assert!(config.validate().is_err());
        assert!(SamplerConfig::default().validate().is_ok());
    }
}
