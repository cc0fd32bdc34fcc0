//! Question prediction pipeline.
//!
//! Resolution order for a question: canned exact/paraphrase match, then the
//! trained classifier, then the off-topic fallback when confidence is too
//! low. Every path records feedback to the knowledge base before returning.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{PredictError, PredictResult};
pub use types::{PredictOptions, Prediction};

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

use crate::cache::{ClassifierCache, LoadedMentor};
use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::knowledge::{
    AuthContext, ClassificationKind, Feedback, KnowledgeStore, OFF_TOPIC_UTTERANCE,
};
use crate::model::{Classifier, ModelError, ModelStore};
use crate::sanitize::sanitize_string;

/// Classifies user questions against a mentor's knowledge and model.
pub struct PredictionPipeline<M: ModelStore, K: KnowledgeStore, E: EmbeddingClient> {
    cache: ClassifierCache<M, K>,
    knowledge: Arc<K>,
    embedding: Arc<E>,
    config: Config,
}

impl<M: ModelStore, K: KnowledgeStore, E: EmbeddingClient> PredictionPipeline<M, K, E> {
    /// Creates a pipeline over the given collaborators.
    pub fn new(store: Arc<M>, knowledge: Arc<K>, embedding: Arc<E>, config: Config) -> Self {
        let cache =
            ClassifierCache::with_capacity(store, Arc::clone(&knowledge), config.cache_capacity);
        Self {
            cache,
            knowledge,
            embedding,
            config,
        }
    }

    /// The underlying classifier cache.
    pub fn cache(&self) -> &ClassifierCache<M, K> {
        &self.cache
    }

    /// Pipeline configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads (or refreshes) a mentor without classifying anything.
    ///
    /// Ping endpoints use this to keep hot mentors resident.
    pub async fn warm(&self, mentor_id: &str, auth: &AuthContext) -> PredictResult<()> {
        self.cache.get(mentor_id, auth).await?;
        Ok(())
    }

    /// Answers `question` for `mentor_id`.
    #[instrument(skip(self, question, auth), fields(mentor_id, question_len = question.len()))]
    pub async fn evaluate(
        &self,
        mentor_id: &str,
        question: &str,
        session_id: &str,
        auth: &AuthContext,
        options: PredictOptions,
    ) -> PredictResult<Prediction> {
        let mentor = self.cache.get(mentor_id, auth).await?;
        let sanitized = sanitize_string(question);

        if !options.canned_match_disabled {
            if let Some(record) = mentor.index().lookup_canned(&sanitized) {
                let kind = if sanitized == sanitize_string(&record.question_text) {
                    ClassificationKind::Exact
                } else {
                    ClassificationKind::Paraphrase
                };
                debug!(question_id = %record.id, %kind, "canned match");

                let feedback_id = self
                    .record_feedback(mentor_id, question, &record.answer_id, kind, 1.0, session_id, auth)
                    .await;

                return Ok(Prediction {
                    question_id: Some(record.id.clone()),
                    answer_id: record.answer_id.clone(),
                    answer_text: record.answer_text.clone(),
                    answer_markdown: record.markdown_answer.clone(),
                    answer_media: record.media.clone(),
                    external_video_ids: record.external_video_ids.clone(),
                    confidence: 1.0,
                    feedback_id,
                    kind,
                    answer_missing: false,
                });
            }
        }

        let embedded = self.embedding.encode(question).await?;
        let label = mentor.model().predict(&embedded)?;
        let confidence = mentor
            .model()
            .decision_scores(&embedded)?
            .confidence()
            .ok_or_else(|| ModelError::Malformed {
                reason: "model produced no decision scores".to_string(),
            })?;

        let kind = if confidence < self.config.off_topic_threshold {
            ClassificationKind::OffTopic
        } else {
            ClassificationKind::Classifier
        };
        info!(%label, confidence, %kind, "classified");

        // Feedback always names the predicted label, even when the response
        // substitutes an off-topic utterance below.
        let feedback_id = self
            .record_feedback(mentor_id, question, &label, kind, confidence, session_id, auth)
            .await;

        if kind == ClassificationKind::OffTopic {
            return Ok(self.off_topic_prediction(&mentor, confidence, feedback_id));
        }

        let Some(answer) = mentor.index().answer_by_id(&label) else {
            warn!(%label, "predicted label has no complete answer");
            return Ok(Prediction {
                question_id: None,
                answer_id: label,
                answer_text: String::new(),
                answer_markdown: String::new(),
                answer_media: Default::default(),
                external_video_ids: Default::default(),
                confidence,
                feedback_id,
                kind,
                answer_missing: true,
            });
        };

        let record = mentor
            .index()
            .question_by_answer(&sanitize_string(&answer.transcript));

        Ok(Prediction {
            question_id: record.map(|r| r.id.clone()),
            answer_id: answer.id.clone(),
            answer_text: answer.transcript.clone(),
            answer_markdown: answer.markdown_transcript.clone(),
            answer_media: record
                .map(|r| r.media.clone())
                .unwrap_or_else(|| answer.media.clone()),
            external_video_ids: answer.external_video_ids.clone(),
            confidence,
            feedback_id,
            kind,
            answer_missing: false,
        })
    }

    fn off_topic_prediction(
        &self,
        mentor: &LoadedMentor<M::Model>,
        confidence: f32,
        feedback_id: Option<String>,
    ) -> Prediction {
        let chosen = mentor
            .index()
            .off_topic_utterances()
            .and_then(|utterances| utterances.choose(&mut rand::thread_rng()).cloned());

        match chosen {
            Some(utterance) => Prediction {
                question_id: None,
                answer_id: utterance.id.clone(),
                answer_text: utterance.transcript.clone(),
                answer_markdown: utterance.markdown_transcript.clone(),
                answer_media: utterance.media.clone(),
                external_video_ids: utterance.external_video_ids.clone(),
                confidence,
                feedback_id,
                kind: ClassificationKind::OffTopic,
                answer_missing: false,
            },
            None => Prediction {
                question_id: None,
                answer_id: OFF_TOPIC_UTTERANCE.to_string(),
                answer_text: OFF_TOPIC_UTTERANCE.to_string(),
                answer_markdown: OFF_TOPIC_UTTERANCE.to_string(),
                answer_media: Default::default(),
                external_video_ids: Default::default(),
                confidence,
                feedback_id,
                kind: ClassificationKind::OffTopic,
                answer_missing: false,
            },
        }
    }

    async fn record_feedback(
        &self,
        mentor_id: &str,
        question: &str,
        answer_id: &str,
        kind: ClassificationKind,
        confidence: f32,
        session_id: &str,
        auth: &AuthContext,
    ) -> Option<String> {
        let feedback = Feedback {
            mentor_id: mentor_id.to_string(),
            question: question.to_string(),
            answer_id: answer_id.to_string(),
            kind,
            confidence,
            session_id: session_id.to_string(),
        };
        match self.knowledge.record_feedback(&feedback, auth).await {
            Ok(id) => Some(id),
            Err(e) => {
                // The answer is already resolved; losing the analytics row
                // must not fail the request.
                warn!(error = %e, mentor_id, "feedback write failed");
                None
            }
        }
    }
}
