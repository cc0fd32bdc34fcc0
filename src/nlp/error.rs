use thiserror::Error;

/// Errors returned by the sentence/entity parser client.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The response body did not match the expected shape.
    #[error("invalid parser response: {reason}")]
    InvalidResponse {
        /// What was malformed.
        reason: String,
    },

    /// Transport-level failure talking to the parser service.
    #[error("parser request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Convenience result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;
