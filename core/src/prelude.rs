use serde::{Deserialize, Serialize};

/// Closed interval used to keep a user-controlled parameter in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamps `value` into the interval. Callers must reject non-finite values first.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn validate(&self, name: &str) -> ModelResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ModelError::NonFinite(format!("{} bounds", name)));
        }
        if self.min > self.max {
            return Err(ModelError::InvalidInput(format!(
                "{} bounds inverted: min {} > max {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Common error type for model evaluation and session configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("non-finite value for {0}")]
    NonFinite(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Rejects NaN and infinities, naming the offending parameter.
pub fn ensure_finite(name: &str, value: f64) -> ModelResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite(name.to_string()))
    }
}

/// Trait shared by the closed-form models: a parameter set that evaluates to a result.
pub trait PhysicsModel {
    type Output;

    fn evaluate(&self) -> ModelResult<Self::Output>;
}
