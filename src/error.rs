//! Crate error type
//!
//! The simulation itself never fails; only configuration loading and
//! progress persistence surface errors.

/// Errors from tuning and persistence
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tuning values rejected by validation
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
