pub mod log;
pub mod metrics;

pub use log::LogManager;
pub use metrics::{MetricsRecorder, SessionMetrics};
