use thiserror::Error;

/// Failures that abort an analysis run. No partial results accompany any of them.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("detection model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("could not read frame at {timestamp:.2}s: {reason}")]
    FrameUnavailable { timestamp: f64, reason: String },

    #[error("analysis cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
