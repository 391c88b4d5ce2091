use crate::generator::curve::{inverse_square_curve, CurveConfig, CurvePoint};
use physcore::counting::{CountingModel, CountingParameters, Measurement, MeasurementSession};
use physcore::telemetry::SessionMetrics;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Everything a chart/table front end needs to redraw the counting experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationModel {
    pub parameters: CountingParameters,
    pub model: CountingModel,
    pub last_measurement: Option<Measurement>,
    pub history: Vec<Measurement>,
    pub curve: Vec<CurvePoint>,
    pub metrics: SessionMetrics,
}

impl VisualizationModel {
    pub fn from_session<R: Rng>(
        session: &MeasurementSession<R>,
        curve: &CurveConfig,
    ) -> anyhow::Result<Self> {
        let parameters = *session.parameters();
        Ok(Self {
            parameters,
            model: session.model(),
            last_measurement: session.last_measurement().copied(),
            history: session.history().iter().copied().collect(),
            curve: inverse_square_curve(parameters.constant, curve)?,
            metrics: session.metrics(),
        })
    }
}
