//! Closed-form models behind the mechanics, astrophysics, modern-physics and
//! waves pages.

pub mod escape;
pub mod photoelectric;
pub mod projectile;
pub mod superposition;

pub use escape::{EscapeResult, EscapeVelocity};
pub use photoelectric::{Photoelectric, PhotoelectricResult};
pub use projectile::{ProjectileLaunch, ProjectileState};
pub use superposition::{Interference, Superposition, SuperpositionSummary};
