use crate::generator::curve::CurveConfig;
use crate::generator::sweep::SweepConfig;
use anyhow::{bail, Context};
use physcore::counting::{CountingParameters, ReferenceReading, SessionConfig};
use physcore::models::{EscapeVelocity, Photoelectric, ProjectileLaunch, Superposition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Closed-form models to evaluate alongside a campaign. Absent sections are skipped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSections {
    pub projectile: Option<ProjectileLaunch>,
    pub escape_velocity: Option<EscapeVelocity>,
    pub photoelectric: Option<Photoelectric>,
    pub superposition: Option<Superposition>,
    /// Reference readings rescaled to the workflow distance.
    pub references: Vec<ReferenceReading>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub parameters: CountingParameters,
    /// Measurements per campaign, and per position in a sweep.
    pub measurements: usize,
    pub session: SessionConfig,
    pub sweep: SweepConfig,
    pub curve: CurveConfig,
    pub models: ModelSections,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            parameters: CountingParameters::default(),
            measurements: 20,
            session: SessionConfig::default(),
            sweep: SweepConfig::default(),
            curve: CurveConfig::default(),
            models: ModelSections::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        parameters: CountingParameters,
        measurements: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            parameters,
            measurements,
            session: SessionConfig {
                seed,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.measurements == 0 {
            bail!("measurements must be at least 1");
        }
        self.parameters
            .ensure_finite()
            .context("validating counting parameters")?;
        self.session.validate().context("validating session config")?;
        self.sweep.validate().context("validating sweep config")?;
        self.curve.validate().context("validating curve config")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_carries_seed() {
        let cfg = WorkflowConfig::from_args(CountingParameters::default(), 5, Some(9));
        assert_eq!(cfg.session.seed, Some(9));
        assert_eq!(cfg.measurements, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"parameters:\n  distance_m: 0.8\n  constant: 4.0\nmeasurements: 5\nsession:\n  history_cap: 10\n  seed: 42\nmodels:\n  projectile:\n    speed_ms: 30.0\n  references:\n    - reading_at_reference: 18.0\n      reference_distance_m: 0.5\n      unit: microsievert_per_hour\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.parameters.distance_m, 0.8);
        assert_eq!(cfg.parameters.count_time_s, 10.0);
        assert_eq!(cfg.session.history_cap, 10);
        assert_eq!(cfg.session.seed, Some(42));
        assert_eq!(cfg.session.sampler.gaussian_threshold, 60.0);
        let projectile = cfg.models.projectile.unwrap();
        assert_eq!(projectile.speed_ms, 30.0);
        assert_eq!(projectile.angle_deg, 45.0);
        assert!(cfg.models.photoelectric.is_none());
        assert_eq!(cfg.models.references, vec![ReferenceReading::gamma_dose()]);
    }

    #[test]
    fn zero_measurements_rejected() {
        let cfg = WorkflowConfig::from_args(CountingParameters::default(), 0, None);
        assert!(cfg.validate().is_err());
    }
}
