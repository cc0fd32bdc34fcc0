//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// A numeric setting could not be parsed.
    #[error("failed to parse {name}='{value}' as a number")]
    InvalidNumber { name: &'static str, value: String },

    /// A threshold is outside its valid range.
    #[error("invalid {name}: {reason}")]
    InvalidThreshold { name: &'static str, reason: String },

    /// A setting that must be positive was zero.
    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },

    /// An endpoint URL was empty.
    #[error("endpoint {name} must not be empty")]
    EmptyEndpoint { name: &'static str },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
