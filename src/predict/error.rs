use thiserror::Error;

use crate::cache::CacheError;
use crate::embedding::EmbeddingError;
use crate::knowledge::KnowledgeError;
use crate::model::ModelError;

/// Errors returned by the prediction pipeline.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Artifact missing, unreadable or inconsistent.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Knowledge base call failed.
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    /// Encoder call failed or returned a malformed response.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl From<CacheError> for PredictError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::Model(e) => PredictError::Model(e),
            CacheError::Knowledge(e) => PredictError::Knowledge(e),
        }
    }
}

/// Convenience result type for prediction operations.
pub type PredictResult<T> = Result<T, PredictError>;
