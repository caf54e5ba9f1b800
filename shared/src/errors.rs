//! Error types for the BW Diet engine
//!
//! Numeric formulas never fail; they return sentinels instead. These
//! errors only surface at the input boundary and when decoding snapshots.

use thiserror::Error;

/// Engine-wide error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Unsupported snapshot schema version {0}")]
    UnsupportedSchema(u32),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Snapshot(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

/// Result alias for engine operations that can fail
pub type CoreResult<T> = Result<T, CoreError>;
