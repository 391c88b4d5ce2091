use serde::{Deserialize, Serialize};

use crate::constants::{ELEMENTARY_CHARGE, PLANCK};
use crate::prelude::{ensure_finite, ModelError, ModelResult, PhysicsModel};

/// Monochromatic light on a metal surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photoelectric {
    pub frequency_hz: f64,
    pub work_function_ev: f64,
    /// Light intensity as a percentage, 0–100.
    pub intensity_pct: f64,
}

impl Default for Photoelectric {
    fn default() -> Self {
        Self {
            frequency_hz: 6.0e14,
            work_function_ev: 2.3,
            intensity_pct: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoelectricResult {
    pub photon_energy_j: f64,
    pub photon_energy_ev: f64,
    pub threshold_frequency_hz: f64,
    pub emits: bool,
    pub max_kinetic_energy_j: f64,
    pub max_kinetic_energy_ev: f64,
    pub stopping_potential_v: f64,
    /// Relative electron emission rate, 0–1.
    pub electron_rate: f64,
}

impl PhysicsModel for Photoelectric {
    type Output = PhotoelectricResult;

    fn evaluate(&self) -> ModelResult<PhotoelectricResult> {
        let frequency = ensure_finite("frequency", self.frequency_hz)?.max(0.0);
        let work_function_ev = ensure_finite("work_function", self.work_function_ev)?;
        let intensity = ensure_finite("intensity", self.intensity_pct)?.clamp(0.0, 100.0);
        if work_function_ev <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "work function must be positive, got {} eV",
                work_function_ev
            )));
        }

        let work_function_j = work_function_ev * ELEMENTARY_CHARGE;
        let photon_energy_j = PLANCK * frequency;
        let surplus = photon_energy_j - work_function_j;
        let emits = surplus > 0.0;
        let max_kinetic_energy_j = if emits { surplus } else { 0.0 };

        Ok(PhotoelectricResult {
            photon_energy_j,
            photon_energy_ev: photon_energy_j / ELEMENTARY_CHARGE,
            threshold_frequency_hz: work_function_j / PLANCK,
            emits,
            max_kinetic_energy_j,
            max_kinetic_energy_ev: max_kinetic_energy_j / ELEMENTARY_CHARGE,
            stopping_potential_v: max_kinetic_energy_j / ELEMENTARY_CHARGE,
            electron_rate: if emits { intensity / 100.0 } else { 0.0 },
        })
    }
}

/// `K_max` in eV as a function of frequency, floored at zero below threshold.
pub fn kinetic_energy_curve(
    work_function_ev: f64,
    min_hz: f64,
    max_hz: f64,
    steps: usize,
) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    let work_function_j = work_function_ev * ELEMENTARY_CHARGE;
    (0..=steps)
        .map(|i| {
            let f = min_hz + (max_hz - min_hz) * i as f64 / steps as f64;
            let k_ev = ((PLANCK * f - work_function_j) / ELEMENTARY_CHARGE).max(0.0);
            (f, k_ev)
        })
        .collect()
}
