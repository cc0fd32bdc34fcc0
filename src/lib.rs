//! Mentor classifier library crate.
//!
//! Answers free-text questions against a per-mentor knowledge base —
//! canned exact/paraphrase matching first, a trained classifier otherwise,
//! with an off-topic fallback below a confidence threshold — and mines a
//! mentor's own answers for named entities to propose follow-up recording
//! questions.
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Engine configuration
//! - [`KnowledgeIndex`], [`QuestionRecord`], [`AnswerRecord`] - Per-mentor knowledge
//! - [`ClassifierCache`], [`LoadedMentor`] - Bounded, freshness-checked model cache
//! - [`PredictionPipeline`], [`Prediction`], [`ClassificationKind`] - Question answering
//! - [`FollowupGenerator`], [`FollowupQuestion`] - Follow-up mining
//!
//! ## External Collaborators
//! Consumed as trait contracts, each with an HTTP implementation:
//! - [`KnowledgeStore`] / [`GraphQlKnowledgeStore`] - mentor graph + feedback
//! - [`EmbeddingClient`] / [`SbertClient`] - encoding, similarity, paraphrase scores
//! - [`ModelStore`] / [`FsModelStore`] - trained classifier artifacts
//! - [`Parser`] / [`HttpParser`] - sentence segmentation, parses, entities
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod embedding;
pub mod followup;
pub mod knowledge;
pub mod model;
pub mod nlp;
pub mod predict;
pub mod sanitize;

pub use cache::{CacheError, CacheResult, ClassifierCache, LoadedMentor};
pub use config::{
    Config, ConfigError, DEFAULT_CACHE_CAPACITY, DEFAULT_OFF_TOPIC_THRESHOLD,
    DEFAULT_PARAPHRASE_THRESHOLD, DEFAULT_SIMILARITY_CONCURRENCY, DEFAULT_SUBJECT_BONUS,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;
pub use embedding::{EmbeddingClient, EmbeddingError, ParaphrasePair, SbertClient};
pub use followup::{
    EntityCategory, EntityObject, FollowupError, FollowupGenerator, FollowupQuestion,
    NO_VERB_WEIGHT, NamedEntitySet, extract_entities, load_pop_culture,
};
#[cfg(any(test, feature = "mock"))]
pub use knowledge::MockKnowledgeStore;
pub use knowledge::{
    AnswerInfo, AnswerMedia, AnswerRecord, AnswerStatus, AuthContext, ClassificationKind,
    ExternalVideoIds, Feedback, GraphQlKnowledgeStore, KnowledgeError, KnowledgeIndex,
    KnowledgeStore, Media, MentorGraph, OFF_TOPIC_UTTERANCE, QuestionKind, QuestionRecord,
};
#[cfg(any(test, feature = "mock"))]
pub use model::MockModelStore;
pub use model::{
    Classifier, DecisionScores, FsModelStore, LinearClassifier, ModelError, ModelStore,
};
#[cfg(any(test, feature = "mock"))]
pub use nlp::{DocumentBuilder, MockParser};
pub use nlp::{Document, EntityLabel, HttpParser, ParseError, Parser};
pub use predict::{PredictError, PredictOptions, Prediction, PredictionPipeline};
pub use sanitize::{normalize_strings, sanitize_string};
