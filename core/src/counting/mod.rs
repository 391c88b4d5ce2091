//! Inverse-square counting experiment: live parameters, theoretical rates and
//! a measurement session that samples detector counts as a Poisson process.

pub mod params;
pub mod reference;
pub mod session;

pub use params::{CountingParameters, ParameterBounds, MIN_DISTANCE_M};
pub use reference::{ReadingUnit, ReferenceReading};
pub use session::{
    CountingModel, Measurement, MeasurementSession, SessionConfig, DEFAULT_HISTORY_CAP,
};
