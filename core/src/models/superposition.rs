use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::prelude::{ensure_finite, ModelError, ModelResult, PhysicsModel};

/// Phases within this distance of a multiple of π count as fully in or out of phase.
const PHASE_TOLERANCE: f64 = 1e-9;

/// Two co-propagating sine waves of equal wavelength and period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Superposition {
    pub amplitude_1: f64,
    pub amplitude_2: f64,
    /// Phase of wave 2 relative to wave 1, radians.
    pub phase_rad: f64,
    pub wavelength: f64,
    pub period_s: f64,
}

impl Default for Superposition {
    fn default() -> Self {
        Self {
            amplitude_1: 60.0,
            amplitude_2: 60.0,
            phase_rad: PI / 2.0,
            wavelength: 320.0,
            period_s: 2.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interference {
    Constructive,
    Destructive,
    Partial,
}

/// Displacement of each wave and their sum at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    pub wave_1: f64,
    pub wave_2: f64,
    pub resultant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperpositionSummary {
    pub phase_rad: f64,
    pub wavenumber: f64,
    pub angular_frequency: f64,
    pub resultant_amplitude: f64,
    pub interference: Interference,
}

impl Superposition {
    fn validate(&self) -> ModelResult<()> {
        ensure_finite("amplitude_1", self.amplitude_1)?;
        ensure_finite("amplitude_2", self.amplitude_2)?;
        ensure_finite("phase", self.phase_rad)?;
        ensure_finite("wavelength", self.wavelength)?;
        ensure_finite("period", self.period_s)?;
        if self.wavelength <= 0.0 || self.period_s <= 0.0 {
            return Err(ModelError::InvalidInput(
                "wavelength and period must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn wavenumber(&self) -> f64 {
        TAU / self.wavelength
    }

    pub fn angular_frequency(&self) -> f64 {
        TAU / self.period_s
    }

    pub fn displacement(&self, x: f64, t: f64) -> Displacement {
        let phase = self.wavenumber() * x - self.angular_frequency() * t;
        let wave_1 = self.amplitude_1 * phase.sin();
        let wave_2 = self.amplitude_2 * (phase + self.phase_rad).sin();
        Displacement {
            wave_1,
            wave_2,
            resultant: wave_1 + wave_2,
        }
    }

    /// Samples `width + 1` unit-spaced points across `[0, width]` at time `t`.
    pub fn profile(&self, width: usize, t: f64) -> Vec<Displacement> {
        (0..=width).map(|x| self.displacement(x as f64, t)).collect()
    }

    pub fn resultant_amplitude(&self) -> f64 {
        let (a1, a2) = (self.amplitude_1, self.amplitude_2);
        (a1 * a1 + a2 * a2 + 2.0 * a1 * a2 * self.phase_rad.cos())
            .max(0.0)
            .sqrt()
    }

    pub fn interference(&self) -> Interference {
        let phase = self.phase_rad.rem_euclid(TAU);
        if phase < PHASE_TOLERANCE || TAU - phase < PHASE_TOLERANCE {
            Interference::Constructive
        } else if (phase - PI).abs() < PHASE_TOLERANCE {
            Interference::Destructive
        } else {
            Interference::Partial
        }
    }
}

impl PhysicsModel for Superposition {
    type Output = SuperpositionSummary;

    fn evaluate(&self) -> ModelResult<SuperpositionSummary> {
        self.validate()?;
        Ok(SuperpositionSummary {
            phase_rad: self.phase_rad,
            wavenumber: self.wavenumber(),
            angular_frequency: self.angular_frequency(),
            resultant_amplitude: self.resultant_amplitude(),
            interference: self.interference(),
        })
    }
}
