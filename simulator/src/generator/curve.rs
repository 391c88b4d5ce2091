use anyhow::{bail, Context};
use physcore::counting::{CountingModel, CountingParameters};
use serde::{Deserialize, Serialize};

/// Sampling of the theoretical `C_net = K / r²` curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    pub steps: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            min_distance_m: 0.1,
            max_distance_m: 1.2,
            steps: 180,
        }
    }
}

impl CurveConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.min_distance_m.is_finite() && self.max_distance_m.is_finite()) {
            bail!("curve distances must be finite");
        }
        if self.min_distance_m <= 0.0 || self.max_distance_m < self.min_distance_m {
            bail!(
                "curve range {}..{} must be positive and ascending",
                self.min_distance_m,
                self.max_distance_m
            );
        }
        if self.steps == 0 {
            bail!("curve needs at least one step");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub distance_m: f64,
    pub net_rate: f64,
}

pub fn inverse_square_curve(constant: f64, config: &CurveConfig) -> anyhow::Result<Vec<CurvePoint>> {
    config.validate().context("validating curve config")?;
    let span = config.max_distance_m - config.min_distance_m;
    let points = (0..=config.steps)
        .map(|i| {
            let distance_m = config.min_distance_m + span * i as f64 / config.steps as f64;
            let params = CountingParameters::new(distance_m, constant, 0.0, 1.0);
            CurvePoint {
                distance_m,
                net_rate: CountingModel::from_parameters(&params).net_rate,
            }
        })
        .collect();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_spans_configured_range() {
        let curve = inverse_square_curve(2.0, &CurveConfig::default()).unwrap();
        assert_eq!(curve.len(), 181);
        assert!((curve[0].distance_m - 0.1).abs() < 1e-12);
        assert!((curve[180].distance_m - 1.2).abs() < 1e-12);
        assert!((curve[0].net_rate - 200.0).abs() < 1e-6);
    }

    #[test]
    fn curve_decreases_with_distance() {
        let curve = inverse_square_curve(2.0, &CurveConfig::default()).unwrap();
        assert!(curve.windows(2).all(|pair| pair[0].net_rate > pair[1].net_rate));
    }

    #[test]
    fn descending_range_rejected() {
        let config = CurveConfig {
            min_distance_m: 1.0,
            max_distance_m: 0.5,
            steps: 10,
        };
        assert!(inverse_square_curve(2.0, &config).is_err());
    }
}
