//! Mentor knowledge base: typed records, lookup index and store contract.

pub mod client;
pub mod error;
pub mod index;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;

pub use client::{GraphQlKnowledgeStore, KnowledgeStore};
pub use error::{KnowledgeError, KnowledgeResult};
pub use index::KnowledgeIndex;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockKnowledgeStore;
pub use types::{
    AnswerInfo, AnswerMedia, AnswerRecord, AnswerRecordRef, AnswerStatus, AuthContext,
    ClassificationKind, ExternalVideoIds, Feedback, GraphAnswer, GraphQuestion, ManualMapping,
    Media, MentorGraph, NamedItem, OFF_TOPIC_UTTERANCE, QuestionKind, QuestionRecord,
    QuestionRecordRef, QuestionRef, QuestionTopics, UserQuestion,
};
