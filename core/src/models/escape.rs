use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_MASS_KG, EARTH_RADIUS_M, GRAVITATIONAL_CONSTANT};
use crate::prelude::{ensure_finite, ModelResult, PhysicsModel};

const MIN_EARTH_FRACTION: f64 = 1e-3;

/// Body described relative to Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscapeVelocity {
    pub mass_earths: f64,
    pub radius_earths: f64,
}

impl Default for EscapeVelocity {
    fn default() -> Self {
        Self {
            mass_earths: 1.0,
            radius_earths: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeResult {
    pub mass_kg: f64,
    pub radius_m: f64,
    pub velocity_ms: f64,
    pub velocity_kms: f64,
    /// Kinetic energy per kilogram needed to escape, J/kg.
    pub specific_energy: f64,
}

impl PhysicsModel for EscapeVelocity {
    type Output = EscapeResult;

    fn evaluate(&self) -> ModelResult<EscapeResult> {
        let mass = ensure_finite("mass", self.mass_earths)?.max(MIN_EARTH_FRACTION);
        let radius = ensure_finite("radius", self.radius_earths)?.max(MIN_EARTH_FRACTION);

        let mass_kg = mass * EARTH_MASS_KG;
        let radius_m = radius * EARTH_RADIUS_M;
        let velocity_ms = (2.0 * GRAVITATIONAL_CONSTANT * mass_kg / radius_m).sqrt();

        Ok(EscapeResult {
            mass_kg,
            radius_m,
            velocity_ms,
            velocity_kms: velocity_ms / 1000.0,
            specific_energy: velocity_ms * velocity_ms / 2.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_escape_velocity() {
        let result = EscapeVelocity::default().evaluate().unwrap();
        assert!((result.velocity_kms - 11.19).abs() < 0.01);
    }

    #[test]
    fn velocity_scales_with_root_mass_over_radius() {
        let earth = EscapeVelocity::default().evaluate().unwrap();
        let dense = EscapeVelocity {
            mass_earths: 4.0,
            radius_earths: 1.0,
        }
        .evaluate()
        .unwrap();
        assert!((dense.velocity_ms / earth.velocity_ms - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_is_floored() {
        let result = EscapeVelocity {
            mass_earths: 1.0,
            radius_earths: 0.0,
        }
        .evaluate()
        .unwrap();
        assert!(result.velocity_ms.is_finite());
    }
}
