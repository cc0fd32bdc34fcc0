use thiserror::Error;

/// Errors returned by the sentence-encoder service client.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The response body did not match the expected shape.
    #[error("invalid encoder response: {reason}")]
    InvalidResponse {
        /// What was malformed.
        reason: String,
    },

    /// Transport-level failure talking to the encoder service.
    #[error("encoder request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Convenience result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
