use serde::{Deserialize, Serialize};

use crate::prelude::{ensure_finite, Bounds, ModelResult};

/// Distance floor applied before any `1 / r²` evaluation.
pub const MIN_DISTANCE_M: f64 = 0.05;
/// Floor for `K` and `T` so rates and `N / T` stay finite.
pub const MIN_POSITIVE: f64 = 1e-6;

/// Live inputs of the inverse-square counting experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingParameters {
    /// Source to detector distance `r`, metres.
    pub distance_m: f64,
    /// Inverse-square constant `K`, s⁻¹·m².
    pub constant: f64,
    /// Background rate `C_bg`, s⁻¹.
    pub background_rate: f64,
    /// Counting time `T`, seconds.
    pub count_time_s: f64,
}

impl Default for CountingParameters {
    fn default() -> Self {
        Self {
            distance_m: 0.4,
            constant: 2.0,
            background_rate: 6.0,
            count_time_s: 10.0,
        }
    }
}

impl CountingParameters {
    pub fn new(distance_m: f64, constant: f64, background_rate: f64, count_time_s: f64) -> Self {
        Self {
            distance_m,
            constant,
            background_rate,
            count_time_s,
        }
    }

    pub fn ensure_finite(&self) -> ModelResult<()> {
        ensure_finite("distance", self.distance_m)?;
        ensure_finite("constant", self.constant)?;
        ensure_finite("background_rate", self.background_rate)?;
        ensure_finite("count_time", self.count_time_s)?;
        Ok(())
    }

    pub fn clamped(&self, bounds: &ParameterBounds) -> Self {
        Self {
            distance_m: bounds.distance_m.clamp(self.distance_m),
            constant: bounds.constant.clamp(self.constant),
            background_rate: bounds.background_rate.clamp(self.background_rate),
            count_time_s: bounds.count_time_s.clamp(self.count_time_s),
        }
    }

    /// Values actually used in rate arithmetic: positive `r`, `K`, `T` and non-negative `C_bg`.
    pub fn effective(&self) -> Self {
        Self {
            distance_m: self.distance_m.max(MIN_DISTANCE_M),
            constant: self.constant.max(MIN_POSITIVE),
            background_rate: self.background_rate.max(0.0),
            count_time_s: self.count_time_s.max(MIN_POSITIVE),
        }
    }
}

/// Allowed range for each counting parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterBounds {
    pub distance_m: Bounds,
    pub constant: Bounds,
    pub background_rate: Bounds,
    pub count_time_s: Bounds,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            distance_m: Bounds::new(0.1, 1.2),
            constant: Bounds::new(0.2, 10.0),
            background_rate: Bounds::new(0.0, 40.0),
            count_time_s: Bounds::new(2.0, 40.0),
        }
    }
}

impl ParameterBounds {
    pub fn validate(&self) -> ModelResult<()> {
        self.distance_m.validate("distance")?;
        self.constant.validate("constant")?;
        self.background_rate.validate("background_rate")?;
        self.count_time_s.validate("count_time")?;
        Ok(())
    }

    pub fn contains(&self, params: &CountingParameters) -> bool {
        self.distance_m.contains(params.distance_m)
            && self.constant.contains(params.constant)
            && self.background_rate.contains(params.background_rate)
            && self.count_time_s.contains(params.count_time_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_pulls_values_into_bounds() {
        let params = CountingParameters::new(0.0, 50.0, -3.0, 100.0);
        let clamped = params.clamped(&ParameterBounds::default());
        assert_eq!(clamped, CountingParameters::new(0.1, 10.0, 0.0, 40.0));
        assert!(ParameterBounds::default().contains(&clamped));
        assert!(!ParameterBounds::default().contains(&params));
    }

    #[test]
    fn effective_floors_degenerate_values() {
        let params = CountingParameters::new(0.0, 0.0, -1.0, 0.0);
        let effective = params.effective();
        assert_eq!(effective.distance_m, MIN_DISTANCE_M);
        assert!(effective.constant > 0.0);
        assert_eq!(effective.background_rate, 0.0);
        assert!(effective.count_time_s > 0.0);
    }

    #[test]
    fn infinite_parameter_is_reported() {
        let params = CountingParameters::new(0.4, f64::INFINITY, 6.0, 10.0);
        assert!(params.ensure_finite().is_err());
        assert!(CountingParameters::default().ensure_finite().is_ok());
    }
}
