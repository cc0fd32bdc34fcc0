use thiserror::Error;

/// Errors returned by classifier artifacts and the model store.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No trained artifact exists for the mentor.
    #[error("no trained model found for mentor {mentor_id}")]
    NotFound {
        /// Requested mentor id.
        mentor_id: String,
    },

    /// The artifact could not be parsed or is internally inconsistent.
    #[error("malformed model artifact: {reason}")]
    Malformed {
        /// What was malformed.
        reason: String,
    },

    /// The input embedding does not match the model's dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension the model was trained with.
        expected: usize,
        /// Dimension of the supplied embedding.
        got: usize,
    },

    /// Filesystem failure other than a missing artifact.
    #[error("model storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
