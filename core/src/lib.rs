//! Core of the physics lab: closed-form models and the counting-statistics
//! simulator behind the inverse-square experiment.
//!
//! Everything here is synchronous and in-memory. Randomness enters only
//! through the `rand::Rng` handed to a [`counting::MeasurementSession`].

pub mod constants;
pub mod counting;
pub mod format;
pub mod math;
pub mod models;
pub mod prelude;
pub mod telemetry;

pub use counting::{CountingModel, CountingParameters, Measurement, MeasurementSession, SessionConfig};
pub use prelude::{ModelError, ModelResult, PhysicsModel};
