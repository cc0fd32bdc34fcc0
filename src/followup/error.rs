use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::knowledge::KnowledgeError;
use crate::nlp::ParseError;

/// Errors returned by follow-up generation.
#[derive(Debug, Error)]
pub enum FollowupError {
    /// The caller may not edit this mentor.
    #[error("not authorized to generate follow-ups for mentor {mentor_id}")]
    NotAuthorized {
        /// Mentor the caller asked about.
        mentor_id: String,
    },

    /// A lexicon file could not be read.
    #[error("lexicon error: {reason}")]
    Lexicon {
        /// What went wrong.
        reason: String,
    },

    /// Knowledge base call failed.
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    /// Embedding service call failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Parser service call failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convenience result type for follow-up operations.
pub type FollowupResult<T> = Result<T, FollowupError>;
