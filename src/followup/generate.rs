//! Follow-up question generation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::knowledge::{AnswerInfo, AuthContext, KnowledgeStore};
use crate::nlp::Parser;

use super::error::{FollowupError, FollowupResult};
use super::extract::{NamedEntitySet, extract_entities};
use super::relevance::{check_relevance, populate_similarity_weights, remove_duplicates};
use super::types::{EntityCategory, EntityMap, FollowupList, FollowupQuestion};

/// Generates candidate follow-up questions from a mentor's own answers.
pub struct FollowupGenerator<K: KnowledgeStore, E: EmbeddingClient, P: Parser> {
    knowledge: Arc<K>,
    embedding: Arc<E>,
    parser: Arc<P>,
    pop_culture: HashSet<String>,
    config: Config,
}

impl<K: KnowledgeStore, E: EmbeddingClient, P: Parser> FollowupGenerator<K, E, P> {
    /// Creates a generator. `pop_culture` is the reference list loaded with
    /// [`super::lexicon::load_pop_culture`]; pass an empty set to disable
    /// the penalty.
    pub fn new(
        knowledge: Arc<K>,
        embedding: Arc<E>,
        parser: Arc<P>,
        pop_culture: HashSet<String>,
        config: Config,
    ) -> Self {
        Self {
            knowledge,
            embedding,
            parser,
            pop_culture,
            config,
        }
    }

    /// Generator configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates ranked follow-ups for one category of the mentor's answers.
    ///
    /// Fetches the category-scoped answers and the mentor's full answered
    /// list, mines entities, scores them and renders templates. Requires
    /// edit permission on the mentor; only the yes/no outcome is consumed
    /// here.
    #[instrument(skip(self, auth), fields(category, mentor_id))]
    pub async fn generate_for_category(
        &self,
        category: &str,
        mentor_id: &str,
        auth: &AuthContext,
    ) -> FollowupResult<Vec<FollowupQuestion>> {
        if !self.knowledge.can_edit_mentor(mentor_id, auth).await? {
            return Err(FollowupError::NotAuthorized {
                mentor_id: mentor_id.to_string(),
            });
        }

        let category_answers = self.knowledge.fetch_category_answers(category, auth).await?;
        let (all_answered, mentor_name) =
            self.knowledge.fetch_mentor_answers_and_name(auth).await?;

        let mut entities =
            extract_entities(self.parser.as_ref(), &category_answers, &mentor_name).await?;
        self.generate_questions(&mut entities, &all_answered).await
    }

    /// Scores an extracted entity set and renders it into ranked follow-ups.
    pub async fn generate_questions(
        &self,
        entities: &mut NamedEntitySet,
        all_answered: &[AnswerInfo],
    ) -> FollowupResult<Vec<FollowupQuestion>> {
        populate_similarity_weights(
            entities,
            all_answered,
            self.embedding.as_ref(),
            self.config.similarity_concurrency,
        )
        .await;

        self.clean_entities(&mut entities.people, all_answered);
        self.clean_entities(&mut entities.places, all_answered);
        self.clean_entities(&mut entities.acronyms, all_answered);
        self.clean_entities(&mut entities.family, all_answered);

        let mut followups = FollowupList::new();
        add_followups(EntityCategory::Family, &entities.family, &mut followups);
        add_followups(EntityCategory::Person, &entities.people, &mut followups);
        add_followups(EntityCategory::Place, &entities.places, &mut followups);
        add_followups(EntityCategory::Acronym, &entities.acronyms, &mut followups);

        if self.config.semantic_dedup {
            self.remove_similar(&mut followups, all_answered).await?;
        }

        let ranked = followups.into_sorted();
        info!(followups = ranked.len(), "follow-ups generated");
        Ok(ranked)
    }

    fn clean_entities(&self, entities: &mut EntityMap, all_answered: &[AnswerInfo]) {
        remove_duplicates(entities, all_answered);
        check_relevance(entities, &self.pop_culture, self.config.subject_bonus);
    }

    /// Removes generated follow-ups that paraphrase an already-answered
    /// question, or each other.
    ///
    /// For every pair scoring above the threshold: when both sides are
    /// still pending follow-ups the lower-weighted one goes (ties drop the
    /// earlier index); when only one side is, that one goes.
    async fn remove_similar(
        &self,
        followups: &mut FollowupList,
        all_answered: &[AnswerInfo],
    ) -> FollowupResult<()> {
        if followups.is_empty() {
            return Ok(());
        }

        let mut questions: Vec<String> = all_answered
            .iter()
            .map(|a| a.question_text.clone())
            .collect();
        questions.extend(followups.iter().map(|f| f.question.clone()));

        let pairs = self.embedding.paraphrase_scores(&questions).await?;
        debug!(pairs = pairs.len(), "paraphrase scores received");

        for pair in pairs {
            if pair.score <= self.config.paraphrase_threshold {
                continue;
            }
            let (Some(first), Some(second)) =
                (questions.get(pair.first), questions.get(pair.second))
            else {
                return Err(FollowupError::Embedding(
                    crate::embedding::EmbeddingError::InvalidResponse {
                        reason: format!(
                            "paraphrase pair ({}, {}) out of range for {} questions",
                            pair.first,
                            pair.second,
                            questions.len()
                        ),
                    },
                ));
            };

            let first_weight = followups.get(first).map(|f| f.weight);
            let second_weight = followups.get(second).map(|f| f.weight);
            let removed = match (first_weight, second_weight) {
                (Some(fw), Some(sw)) => {
                    if fw <= sw {
                        followups.remove(first)
                    } else {
                        followups.remove(second)
                    }
                }
                (Some(_), None) => followups.remove(first),
                (None, Some(_)) => followups.remove(second),
                (None, None) => None,
            };
            if let Some(removed) = removed {
                warn!(
                    question = %removed.question,
                    score = pair.score,
                    "follow-up dropped as paraphrase"
                );
            }
        }
        Ok(())
    }
}

fn add_followups(category: EntityCategory, entities: &EntityMap, followups: &mut FollowupList) {
    for entity in entities.iter() {
        let question = category.template(&entity.text);
        followups.insert(FollowupQuestion {
            question,
            entity: entity.text.clone(),
            template: category,
            weight: entity.weight,
            verb: entity.verb.clone(),
        });
    }
}
