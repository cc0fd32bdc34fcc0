use thiserror::Error;

/// Errors returned by knowledge-base operations.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The knowledge base has no such mentor.
    #[error("mentor not found: {mentor_id}")]
    MentorNotFound {
        /// Requested mentor id.
        mentor_id: String,
    },

    /// The GraphQL response carried an errors array.
    #[error("knowledge base rejected the request: {message}")]
    GraphQl {
        /// Serialized error payload.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("invalid knowledge base response: {reason}")]
    InvalidResponse {
        /// What was malformed.
        reason: String,
    },

    /// Transport-level failure talking to the knowledge base.
    #[error("knowledge base request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Convenience result type for knowledge operations.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
