use thiserror::Error;

use crate::knowledge::KnowledgeError;
use crate::model::ModelError;

/// Errors returned while resolving a mentor's classifier.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Artifact missing or unreadable.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Mentor graph could not be fetched.
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
