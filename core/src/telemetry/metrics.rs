use crate::math::sampling::SamplingRegime;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Running counters for a measurement session.
pub struct MetricsRecorder {
    inner: Mutex<SessionMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub measurements: usize,
    pub clears: usize,
    pub exact_draws: usize,
    pub gaussian_draws: usize,
    pub degenerate_draws: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SessionMetrics::default()),
        }
    }

    pub fn record_measurement(&self, regime: SamplingRegime) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.measurements += 1;
            match regime {
                SamplingRegime::Exact => metrics.exact_draws += 1,
                SamplingRegime::Gaussian => metrics.gaussian_draws += 1,
                SamplingRegime::Degenerate => metrics.degenerate_draws += 1,
            }
        }
    }

    pub fn record_clear(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.clears += 1;
        }
    }

    pub fn snapshot(&self) -> SessionMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            SessionMetrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_splits_draws_by_regime() {
        let recorder = MetricsRecorder::new();
        recorder.record_measurement(SamplingRegime::Exact);
        recorder.record_measurement(SamplingRegime::Gaussian);
        recorder.record_measurement(SamplingRegime::Gaussian);
        recorder.record_clear();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.measurements, 3);
        assert_eq!(snapshot.exact_draws, 1);
        assert_eq!(snapshot.gaussian_draws, 2);
        assert_eq!(snapshot.clears, 1);
    }
}
