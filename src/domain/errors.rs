//! Domain error types
//!
//! This module defines the error hierarchy for Caravan. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Caravan error type
///
/// This is the primary error type used throughout the pipeline. Each variant
/// maps to one branch of the export error taxonomy: validation errors abort a
/// request before an operation is created, configuration errors abort a batch
/// invocation, and data-store errors are surfaced for the host's retry policy.
#[derive(Debug, Error)]
pub enum CaravanError {
    /// Configuration-related errors (missing providers, unusable settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Settings validation errors, reported for a single offending field
    #[error("Validation error for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Transient data-store errors (instance store, secret store, destination)
    #[error("Data store error: {0}")]
    DataStore(String),

    /// Identifier resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Durable operation client errors
    #[error("Operation error: {0}")]
    Operation(String),
}

impl CaravanError {
    /// Creates a validation error for a single offending field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CaravanError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors produced when a logical identifier resolves to zero stored instances
///
/// These are never fatal to a batch: each one is carried inside a failed
/// read result and counted toward the batch's failure total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No instances exist for the referenced study
    #[error("The specified study cannot be found")]
    StudyNotFound,

    /// No instances exist for the referenced series
    #[error("The specified series cannot be found")]
    SeriesNotFound,

    /// The referenced instance does not exist
    #[error("The specified instance cannot be found")]
    InstanceNotFound,
}

// Conversion from std::io::Error
impl From<std::io::Error> for CaravanError {
    fn from(err: std::io::Error) -> Self {
        CaravanError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CaravanError {
    fn from(err: serde_json::Error) -> Self {
        CaravanError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CaravanError {
    fn from(err: toml::de::Error) -> Self {
        CaravanError::Configuration(format!("TOML parse error: {err}"))
    }
}
