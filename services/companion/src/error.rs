//! services/companion/src/error.rs
//!
//! Defines the primary error type for the companion service.

use crate::config::ConfigError;
use crate::repositories::RepoError;
use mindcare_core::ports::PortError;
use mindcare_core::validation::FieldErrors;

/// The primary error type for the `companion` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the storage port.
    #[error("Storage error: {0}")]
    Port(#[from] PortError),

    /// A repository could not load or save its records.
    #[error("Repository error: {0}")]
    Repository(#[from] RepoError),

    /// One or more form fields were rejected.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
