pub mod curve;
pub mod sweep;
