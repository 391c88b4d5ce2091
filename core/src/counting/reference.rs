use serde::{Deserialize, Serialize};

use crate::counting::params::MIN_DISTANCE_M;
use crate::prelude::{ensure_finite, ModelError, ModelResult};

/// Unit a reference reading is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingUnit {
    Lux,
    MicrosievertPerHour,
    /// Relative signal strength, saturates at 100 %.
    Percent,
}

impl ReadingUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            ReadingUnit::Lux => "lx",
            ReadingUnit::MicrosievertPerHour => "µSv/h",
            ReadingUnit::Percent => "%",
        }
    }
}

/// A reading `D0` known at reference distance `r0`, rescaled as `D(r) = D0 (r0 / r)²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceReading {
    pub reading_at_reference: f64,
    pub reference_distance_m: f64,
    pub unit: ReadingUnit,
}

impl ReferenceReading {
    pub fn new(reading_at_reference: f64, reference_distance_m: f64, unit: ReadingUnit) -> ModelResult<Self> {
        ensure_finite("reading_at_reference", reading_at_reference)?;
        ensure_finite("reference_distance", reference_distance_m)?;
        if reference_distance_m <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "reference distance must be positive, got {}",
                reference_distance_m
            )));
        }
        Ok(Self {
            reading_at_reference,
            reference_distance_m,
            unit,
        })
    }

    /// Torch brightness on a lux meter, 1200 lx at 0.5 m.
    pub fn torch() -> Self {
        Self {
            reading_at_reference: 1200.0,
            reference_distance_m: 0.5,
            unit: ReadingUnit::Lux,
        }
    }

    /// Gamma dose rate, 18 µSv/h at 0.5 m.
    pub fn gamma_dose() -> Self {
        Self {
            reading_at_reference: 18.0,
            reference_distance_m: 0.5,
            unit: ReadingUnit::MicrosievertPerHour,
        }
    }

    /// Relative radio signal, 100 % at 0.5 m.
    pub fn radio_signal() -> Self {
        Self {
            reading_at_reference: 100.0,
            reference_distance_m: 0.5,
            unit: ReadingUnit::Percent,
        }
    }

    /// `(r0 / r)²` with `r` floored at the minimum distance.
    pub fn scale_factor(&self, distance_m: f64) -> f64 {
        let r = distance_m.max(MIN_DISTANCE_M);
        let r0 = self.reference_distance_m;
        (r0 * r0) / (r * r)
    }

    pub fn reading_at(&self, distance_m: f64) -> f64 {
        let raw = self.reading_at_reference * self.scale_factor(distance_m);
        match self.unit {
            ReadingUnit::Percent => raw.clamp(0.0, 100.0),
            _ => raw,
        }
    }
}
