pub mod sampling;
pub mod stats;

pub use sampling::{PoissonSampler, SamplerConfig, SamplingRegime};
pub use stats::StatsHelper;
