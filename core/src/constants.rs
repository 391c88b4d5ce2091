//! Physical constants (SI) used by the closed-form models.

/// Gravitational constant, m³ kg⁻¹ s⁻².
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;
/// Standard gravitational acceleration near Earth's surface, m s⁻².
pub const STANDARD_GRAVITY: f64 = 9.81;
/// Planck constant, J s.
pub const PLANCK: f64 = 6.626_070_15e-34;
/// Elementary charge, C.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
pub const EARTH_MASS_KG: f64 = 5.972e24;
pub const EARTH_RADIUS_M: f64 = 6.371e6;
