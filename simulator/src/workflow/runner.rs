use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use physcore::counting::{
    CountingModel, CountingParameters, Measurement, MeasurementSession, ReadingUnit,
    ReferenceReading,
};
use physcore::format::{fixed, pi_fraction, scientific};
use physcore::math::StatsHelper;
use physcore::models::photoelectric::kinetic_energy_curve;
use physcore::models::superposition::Displacement;
use physcore::models::{
    EscapeResult, PhotoelectricResult, ProjectileState, SuperpositionSummary,
};
use physcore::telemetry::SessionMetrics;
use physcore::PhysicsModel;
use serde::Serialize;

pub struct CampaignResult {
    pub parameters: CountingParameters,
    pub model: CountingModel,
    pub expected_counts: f64,
    pub counts: Vec<u64>,
    pub mean_counts: f64,
    pub variance_counts: f64,
    pub history: Vec<Measurement>,
    pub metrics: SessionMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub distance_m: f64,
    pub theoretical_net_rate: f64,
    pub mean_net_rate: f64,
    pub measurements: usize,
}

/// Upper end of the `K_max` against frequency curve, Hz.
const KINETIC_CURVE_MAX_HZ: f64 = 1.2e15;
const KINETIC_CURVE_STEPS: usize = 140;
/// Width of the sampled superposition profile, in wavelength units.
const PROFILE_WIDTH: usize = 980;

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub unit: ReadingUnit,
    pub distance_m: f64,
    pub scale_factor: f64,
    pub reading: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelReport {
    pub projectile: Option<ProjectileState>,
    pub escape_velocity: Option<EscapeResult>,
    pub photoelectric: Option<PhotoelectricResult>,
    /// `(frequency Hz, K_max eV)` pairs for the configured work function.
    pub kinetic_energy_curve: Vec<(f64, f64)>,
    pub superposition: Option<SuperpositionSummary>,
    /// Resultant profile at `t = 0`.
    pub superposition_profile: Vec<Displacement>,
    pub references: Vec<ReferenceReport>,
}

impl ModelReport {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(p) = &self.projectile {
            lines.push(format!(
                "projectile -> range {} m, max height {} m, flight {} s",
                fixed(p.range, 2),
                fixed(p.max_height, 2),
                fixed(p.time_of_flight, 2)
            ));
        }
        if let Some(e) = &self.escape_velocity {
            lines.push(format!(
                "escape velocity -> {} km/s (M {} kg, R {} m)",
                fixed(e.velocity_kms, 2),
                scientific(e.mass_kg, 3),
                scientific(e.radius_m, 3)
            ));
        }
        if let Some(pe) = &self.photoelectric {
            lines.push(format!(
                "photoelectric -> emits {}, K_max {} eV, f0 {} Hz",
                pe.emits,
                fixed(pe.max_kinetic_energy_ev, 3),
                scientific(pe.threshold_frequency_hz, 3)
            ));
        }
        if let Some(&(frequency, k_max)) = self.kinetic_energy_curve.last() {
            lines.push(format!(
                "photoelectric curve -> {} points, K_max {} eV at {} Hz",
                self.kinetic_energy_curve.len(),
                fixed(k_max, 3),
                scientific(frequency, 3)
            ));
        }
        if let Some(s) = &self.superposition {
            let peak = self
                .superposition_profile
                .iter()
                .map(|d| d.resultant.abs())
                .fold(0.0_f64, f64::max);
            lines.push(format!(
                "superposition -> phase {}, resultant amplitude {}, profile peak {} ({:?})",
                pi_fraction(s.phase_rad),
                fixed(s.resultant_amplitude, 2),
                fixed(peak, 2),
                s.interference
            ));
        }
        for r in &self.references {
            lines.push(format!(
                "reference -> r {} m, (r0/r)^2 {}, reading {} {}",
                fixed(r.distance_m, 2),
                fixed(r.scale_factor, 2),
                fixed(r.reading, 2),
                r.unit.symbol()
            ));
        }
        lines
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Session seeded from the workflow and holding its parameters.
    pub fn open_session(&self) -> anyhow::Result<MeasurementSession> {
        let mut session = MeasurementSession::new(self.config.session.clone())
            .context("creating measurement session")?;
        session
            .set_parameters(self.config.parameters)
            .context("applying workflow parameters")?;
        Ok(session)
    }

    pub fn execute(&self) -> anyhow::Result<CampaignResult> {
        let mut session = self.open_session()?;
        let parameters = *session.parameters();
        let model = session.model();
        let expected_counts = model.expected_counts(parameters.effective().count_time_s);

        let counts: Vec<u64> = (0..self.config.measurements)
            .map(|_| session.take_measurement().counts)
            .collect();
        let (mean_counts, variance_counts) = StatsHelper::count_summary(&counts);
        info!(
            "campaign complete: {} measurements, expected {:.2}, mean {:.2}",
            counts.len(),
            expected_counts,
            mean_counts
        );

        Ok(CampaignResult {
            parameters,
            model,
            expected_counts,
            counts,
            mean_counts,
            variance_counts,
            history: session.history().iter().copied().collect(),
            metrics: session.metrics(),
        })
    }

    pub fn sweep(&self) -> anyhow::Result<Vec<SweepPoint>> {
        let mut session = self.open_session()?;
        let base = self.config.parameters;
        let mut points = Vec::with_capacity(self.config.sweep.steps);

        for distance_m in self.config.sweep.distances() {
            let applied = session
                .set_parameters(CountingParameters { distance_m, ..base })
                .with_context(|| format!("moving detector to {} m", distance_m))?;
            let net_rates: Vec<f64> = (0..self.config.measurements)
                .map(|_| session.take_measurement().net_rate)
                .collect();
            points.push(SweepPoint {
                distance_m: applied.distance_m,
                theoretical_net_rate: session.model().net_rate,
                mean_net_rate: StatsHelper::mean(&net_rates),
                measurements: net_rates.len(),
            });
        }

        info!("sweep complete: {} positions", points.len());
        Ok(points)
    }

    pub fn evaluate_models(&self) -> anyhow::Result<ModelReport> {
        let models = &self.config.models;
        let distance_m = self.config.parameters.distance_m;

        let mut references = Vec::with_capacity(models.references.len());
        for entry in &models.references {
            let reading = ReferenceReading::new(
                entry.reading_at_reference,
                entry.reference_distance_m,
                entry.unit,
            )
            .context("validating reference reading")?;
            references.push(ReferenceReport {
                unit: reading.unit,
                distance_m,
                scale_factor: reading.scale_factor(distance_m),
                reading: reading.reading_at(distance_m),
            });
        }

        let kinetic_energy_curve = models
            .photoelectric
            .map(|m| {
                kinetic_energy_curve(
                    m.work_function_ev,
                    0.0,
                    KINETIC_CURVE_MAX_HZ,
                    KINETIC_CURVE_STEPS,
                )
            })
            .unwrap_or_default();
        let superposition_profile = models
            .superposition
            .map(|m| m.profile(PROFILE_WIDTH, 0.0))
            .unwrap_or_default();

        Ok(ModelReport {
            projectile: models
                .projectile
                .map(|m| m.evaluate())
                .transpose()
                .context("evaluating projectile")?,
            escape_velocity: models
                .escape_velocity
                .map(|m| m.evaluate())
                .transpose()
                .context("evaluating escape velocity")?,
            photoelectric: models
                .photoelectric
                .map(|m| m.evaluate())
                .transpose()
                .context("evaluating photoelectric")?,
            superposition: models
                .superposition
                .map(|m| m.evaluate())
                .transpose()
                .context("evaluating superposition")?,
            kinetic_energy_curve,
            superposition_profile,
            references,
        })
    }
}
