pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Unbiased sample variance (n - 1 denominator). Zero for fewer than two samples.
    pub fn variance(samples: &[f64]) -> f64 {
        if samples.len() < 2 {
            return 0.0;
        }
        let mean = Self::mean(samples);
        let sum_sq: f64 = samples.iter().map(|&v| (v - mean) * (v - mean)).sum();
        sum_sq / (samples.len() - 1) as f64
    }

    /// Mean and variance of integer counts.
    pub fn count_summary(counts: &[u64]) -> (f64, f64) {
        let values: Vec<f64> = counts.iter().map(|&n| n as f64).collect();
        (Self::mean(&values), Self::variance(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_yields_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::variance(&[]), 0.0);
        assert_eq!(StatsHelper::variance(&[3.0]), 0.0);
    }

    #[test]
    fn variance_uses_sample_denominator() {
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(StatsHelper::mean(&samples), 5.0);
        assert!((StatsHelper::variance(&samples) - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn count_summary_matches_float_path() {
        let (mean, variance) = StatsHelper::count_summary(&[1, 2, 3]);
        assert_eq!(mean, 2.0);
        assert_eq!(variance, 1.0);
    }
}
