//! Error types for video generation jobs.

use std::time::Duration;

/// Errors that can occur while generating or fetching a video.
#[derive(Debug, thiserror::Error)]
pub enum RunwayError {
    /// The submission request was rejected or returned no task id.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The remote task reached a failed or canceled terminal state.
    #[error("task {status}: {detail}")]
    Task {
        /// Terminal status reported by the API (`FAILED` or `CANCELED`).
        status: String,
        /// Failure detail from the task response, if any.
        detail: String,
    },

    /// Polling deadline elapsed without reaching a terminal state.
    #[error("timed out after {waited:?} and {attempts} polling attempts")]
    Timeout {
        /// How long the poll loop waited.
        waited: Duration,
        /// Number of status checks issued before giving up.
        attempts: u32,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Image decode, resize, or encode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (e.g., writing a downloaded video).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node received a missing or mistyped input value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RunwayError {
    /// Returns true if this error is transient: the poll loop retries it
    /// instead of aborting.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Json(_))
    }
}

/// Result type alias for video generation operations.
pub type Result<T> = std::result::Result<T, RunwayError>;
