use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::counting::params::{CountingParameters, ParameterBounds};
use crate::math::sampling::{PoissonSampler, SamplerConfig};
use crate::prelude::{ModelError, ModelResult};
use crate::telemetry::{LogManager, MetricsRecorder, SessionMetrics};

/// Number of measurements kept before the oldest is dropped.
pub const DEFAULT_HISTORY_CAP: usize = 18;

/// Externally owned configuration for a measurement session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history_cap: usize,
    pub sampler: SamplerConfig,
    pub bounds: ParameterBounds,
    /// Fixed seed for reproducible campaigns; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            sampler: SamplerConfig::default(),
            bounds: ParameterBounds::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if self.history_cap == 0 {
            return Err(ModelError::InvalidInput(
                "history_cap must be at least 1".into(),
            ));
        }
        self.sampler.validate()?;
        self.bounds.validate()
    }
}

/// Theoretical rates for the current parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountingModel {
    /// `C_net = K / r²`, s⁻¹.
    pub net_rate: f64,
    /// `C_gross = C_net + C_bg`, s⁻¹.
    pub gross_rate: f64,
}

impl CountingModel {
    pub fn from_parameters(params: &CountingParameters) -> Self {
        let p = params.effective();
        let net_rate = p.constant / (p.distance_m * p.distance_m);
        Self {
            net_rate,
            gross_rate: net_rate + p.background_rate,
        }
    }

    /// Expected total counts `λ = C_gross · T`.
    pub fn expected_counts(&self, count_time_s: f64) -> f64 {
        self.gross_rate * count_time_s
    }
}

/// One simulated detector reading. Never mutated once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Distance as set, before the division floor.
    pub distance_m: f64,
    /// Counting time used for `C = N / T`, after the positive floor.
    pub count_time_s: f64,
    /// `λ` the count was drawn from.
    pub expected_counts: f64,
    /// Sampled count `N`.
    pub counts: u64,
    /// `C = N / T`, s⁻¹.
    pub gross_rate: f64,
    /// `C − C_bg`, s⁻¹. Negative when the draw falls below background.
    pub net_rate: f64,
}

/// Interactive counting session: live parameters plus a bounded, most-recent-first history.
pub struct MeasurementSession<R: Rng = StdRng> {
    config: SessionConfig,
    params: CountingParameters,
    sampler: PoissonSampler,
    history: VecDeque<Measurement>,
    last: Option<Measurement>,
    rng: R,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl MeasurementSession<StdRng> {
    pub fn new(config: SessionConfig) -> ModelResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> MeasurementSession<R> {
    pub fn with_rng(config: SessionConfig, rng: R) -> ModelResult<Self> {
        config.validate()?;
        let params = CountingParameters::default().clamped(&config.bounds);
        Ok(Self {
            sampler: PoissonSampler::new(config.sampler),
            history: VecDeque::new(),
            config,
            params,
            last: None,
            rng,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("session"),
        })
    }

    pub fn parameters(&self) -> &CountingParameters {
        &self.params
    }

    /// Stores `params` clamped to the configured bounds and returns what was applied.
    ///
    /// Non-finite values are rejected and leave the previous parameters in place.
    pub fn set_parameters(&mut self, params: CountingParameters) -> ModelResult<CountingParameters> {
        params.ensure_finite()?;
        let applied = params.clamped(&self.config.bounds);
        if applied != params {
            self.logger.warn(&format!(
                "parameters clamped from {:?} to {:?}",
                params, applied
            ));
        }
        self.params = applied;
        self.logger.detail(&format!("parameters set {:?}", applied));
        Ok(applied)
    }

    pub fn model(&self) -> CountingModel {
        CountingModel::from_parameters(&self.params)
    }

    pub fn take_measurement(&mut self) -> Measurement {
        let effective = self.params.effective();
        let model = CountingModel::from_parameters(&effective);
        let lambda = model.expected_counts(effective.count_time_s);
        let (counts, regime) = self.sampler.sample_with_regime(lambda, &mut self.rng);
        let gross_rate = counts as f64 / effective.count_time_s;

        let measurement = Measurement {
            distance_m: self.params.distance_m,
            count_time_s: effective.count_time_s,
            expected_counts: lambda,
            counts,
            gross_rate,
            net_rate: gross_rate - effective.background_rate,
        };

        self.history.push_front(measurement);
        self.history.truncate(self.config.history_cap);
        self.last = Some(measurement);
        self.metrics.record_measurement(regime);
        self.logger.detail(&format!("lambda {:.3} sampled via {:?}", lambda, regime));
        self.logger.record(&format!(
            "measurement r={:.2}m N={} C_net={:.2}s^-1",
            measurement.distance_m, measurement.counts, measurement.net_rate
        ));
        measurement
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.last = None;
        self.metrics.record_clear();
        self.logger.record("history cleared");
    }

    /// Recorded measurements, most recent first.
    pub fn history(&self) -> &VecDeque<Measurement> {
        &self.history
    }

    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.last.as_ref()
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> MeasurementSession {
        MeasurementSession::new(SessionConfig {
            seed: Some(seed),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn model_follows_inverse_square() {
        let mut session = seeded(1);
        session
            .set_parameters(CountingParameters::new(0.4, 2.0, 6.0, 10.0))
            .unwrap();
        let model = session.model();
        assert!((model.net_rate - 12.5).abs() < 1e-9);
        assert!((model.gross_rate - 18.5).abs() < 1e-9);
        assert!((model.expected_counts(10.0) - 185.0).abs() < 1e-9);
    }

    #[test]
    fn model_is_idempotent() {
        let session = seeded(2);
        assert_eq!(session.model(), session.model());
    }

    #[test]
    fn measurements_average_to_expected_counts() {
        let mut session = seeded(3);
        session
            .set_parameters(CountingParameters::new(0.4, 2.0, 6.0, 10.0))
            .unwrap();
        let trials = 5_000;
        let total: u64 = (0..trials).map(|_| session.take_measurement().counts).sum();
        let mean = total as f64 / trials as f64;
        assert!((mean - 185.0).abs() < 1.5, "mean {}", mean);
    }

    #[test]
    fn measurement_rates_derive_from_counts() {
        let mut session = seeded(4);
        let measurement = session.take_measurement();
        let params = *session.parameters();
        assert_eq!(
            measurement.gross_rate,
            measurement.counts as f64 / params.count_time_s
        );
        assert_eq!(
            measurement.net_rate,
            measurement.gross_rate - params.background_rate
        );
        assert_eq!(session.last_measurement(), Some(&measurement));
    }

    #[test]
    fn history_is_capped_and_most_recent_first() {
        let mut session = seeded(5);
        for step in 0..20 {
            let distance = 0.1 + step as f64 * 0.05;
            session
                .set_parameters(CountingParameters::new(distance, 2.0, 6.0, 10.0))
                .unwrap();
            session.take_measurement();
        }

        let history = session.history();
        assert_eq!(history.len(), DEFAULT_HISTORY_CAP);
        // distances 0.1 .. 1.05 were used in order; the two oldest were dropped
        assert!((history[0].distance_m - 1.05).abs() < 1e-9);
        assert!((history[17].distance_m - 0.2).abs() < 1e-9);
        assert!(history
            .iter()
            .zip(history.iter().skip(1))
            .all(|(newer, older)| newer.distance_m > older.distance_m));
    }

    #[test]
    fn clear_resets_history_and_last_only() {
        let mut session = seeded(6);
        let params = CountingParameters::new(0.7, 3.0, 1.0, 20.0);
        session.set_parameters(params).unwrap();
        session.take_measurement();
        session.take_measurement();

        session.clear();
        assert!(session.history().is_empty());
        assert!(session.last_measurement().is_none());
        assert_eq!(*session.parameters(), params);
        assert_eq!(session.metrics().clears, 1);
        assert_eq!(session.metrics().measurements, 2);
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        let mut session = seeded(7);
        let applied = session
            .set_parameters(CountingParameters::new(0.0, 2.0, 6.0, 0.0))
            .unwrap();
        assert_eq!(applied.distance_m, 0.1);
        assert_eq!(applied.count_time_s, 2.0);
        assert_eq!(*session.parameters(), applied);
        assert!(session.model().net_rate.is_finite());
    }

    #[test]
    fn non_finite_parameters_keep_previous_state() {
        let mut session = seeded(8);
        let before = *session.parameters();
        let err = session
            .set_parameters(CountingParameters::new(f64::NAN, 2.0, 6.0, 10.0))
            .unwrap_err();
        assert_eq!(err, ModelError::NonFinite("distance".into()));
        assert_eq!(*session.parameters(), before);
    }

    #[test]
    fn permissive_bounds_still_avoid_division_by_zero() {
        let config = SessionConfig {
            bounds: ParameterBounds {
                distance_m: crate::prelude::Bounds::new(0.0, 10.0),
                count_time_s: crate::prelude::Bounds::new(0.0, 10.0),
                ..Default::default()
            },
            seed: Some(9),
            ..Default::default()
        };
        let mut session = MeasurementSession::new(config).unwrap();
        session
            .set_parameters(CountingParameters::new(0.0, 2.0, 6.0, 0.0))
            .unwrap();
        let measurement = session.take_measurement();
        assert!(measurement.gross_rate.is_finite());
        assert_eq!(measurement.distance_m, 0.0);
        assert_eq!(measurement.count_time_s, crate::counting::params::MIN_POSITIVE);
        assert!(session.model().net_rate.is_finite());
    }

    #[test]
    fn zero_history_cap_is_rejected() {
        let config = SessionConfig {
            history_cap: 0,
            ..Default::default()
        };
        assert!(MeasurementSession::new(config).is_err());
    }

    #[test]
    fn small_rates_use_exact_sampling() {
        let mut session = seeded(10);
        // λ = (0.2 / 1.44 + 0) * 2 ≈ 0.28
        session
            .set_parameters(CountingParameters::new(1.2, 0.2, 0.0, 2.0))
            .unwrap();
        session.take_measurement();
        let metrics = session.metrics();
        assert_eq!(metrics.exact_draws, 1);
        assert_eq!(metrics.gaussian_draws, 0);
    }

    #[test]
    fn measurement_serializes_with_field_names() {
        let mut session = seeded(11);
        let measurement = session.take_measurement();
        let value = serde_json::to_value(measurement).unwrap();
        assert_eq!(value["counts"], serde_json::json!(measurement.counts));
        assert!(value.get("net_rate").is_some());
    }
}
