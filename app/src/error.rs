//! Application error handling
//!
//! Service and store failures. The binary wraps these in `anyhow` and
//! prints them; validation failures are shown to the user as is.

use bw_diet_shared::{CoreError, LoadError};
use thiserror::Error;

/// Error type returned by services and the snapshot file store
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    /// True for errors caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NotFound(_)
                | AppError::Core(CoreError::Validation(_))
                | AppError::Core(CoreError::NotFound(_))
        )
    }
}

impl<E> From<LoadError<E>> for AppError
where
    E: std::error::Error + 'static,
    AppError: From<E>,
{
    fn from(err: LoadError<E>) -> Self {
        match err {
            LoadError::Store(inner) => AppError::from(inner),
            LoadError::Snapshot(inner) => AppError::Core(inner),
        }
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
