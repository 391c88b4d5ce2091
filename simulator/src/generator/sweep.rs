use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Evenly spaced detector positions for a distance sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start_m: f64,
    pub end_m: f64,
    pub steps: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_m: 0.1,
            end_m: 1.2,
            steps: 12,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.start_m.is_finite() && self.end_m.is_finite()) {
            bail!("sweep distances must be finite");
        }
        if self.steps == 0 {
            bail!("sweep needs at least one position");
        }
        Ok(())
    }

    /// `steps` positions from `start_m` to `end_m` inclusive; a single step sits at `start_m`.
    pub fn distances(&self) -> Vec<f64> {
        if self.steps <= 1 {
            return vec![self.start_m];
        }
        let span = self.end_m - self.start_m;
        (0..self.steps)
            .map(|i| self.start_m + span * i as f64 / (self.steps - 1) as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_include_both_ends() {
        let sweep = SweepConfig {
            start_m: 0.2,
            end_m: 1.0,
            steps: 5,
        };
        let distances = sweep.distances();
        assert_eq!(distances.len(), 5);
        assert!((distances[0] - 0.2).abs() < 1e-12);
        assert!((distances[2] - 0.6).abs() < 1e-12);
        assert!((distances[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_step_sits_at_start() {
        let sweep = SweepConfig {
            steps: 1,
            ..Default::default()
        };
        assert_eq!(sweep.distances(), vec![0.1]);
    }
}
