//! Entity relevance scoring.
//!
//! Two passes: a fanned-out similarity request per distinct entity text,
//! then dependency-walk adjustments (pop-culture penalty, first-person verb
//! bonus, no-verb floor).

use std::collections::{HashMap, HashSet};

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, warn};

use crate::embedding::EmbeddingClient;
use crate::knowledge::AnswerInfo;
use crate::nlp::{DepRel, Pos};

use super::extract::NamedEntitySet;
use super::types::EntityMap;

/// Weight assigned when an entity's answer contains no verb at all.
pub const NO_VERB_WEIGHT: f32 = -1.0;

fn joined_answered_text(all_answered: &[AnswerInfo]) -> String {
    all_answered
        .iter()
        .map(|a| a.question_text.as_str())
        .collect()
}

/// Drops entities whose text already occurs verbatim inside any answered
/// question text.
pub(crate) fn remove_duplicates(entities: &mut EntityMap, all_answered: &[AnswerInfo]) {
    let answered = joined_answered_text(all_answered);
    entities.retain(|e| !answered.contains(&e.text));
}

/// Fans similarity requests out over a bounded task group and merges the
/// results by entity text.
///
/// The merge tolerates any completion order and yields at most one score
/// per requested text. A failed request drops only its own entity: the text
/// is simply absent from the returned map.
pub(crate) async fn similarity_weights<E: EmbeddingClient>(
    embedding: &E,
    corpus: &str,
    texts: Vec<String>,
    concurrency: usize,
) -> HashMap<String, f32> {
    let results: Vec<(String, Result<f32, _>)> = stream::iter(texts)
        .map(|text| async move {
            let score = embedding.similarity(corpus, &text).await;
            (text, score)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut merged = HashMap::new();
    for (text, result) in results {
        match result {
            Ok(score) => {
                merged.insert(text, score);
            }
            Err(e) => {
                warn!(entity = %text, error = %e, "similarity unavailable, dropping entity");
            }
        }
    }
    merged
}

/// Populates `cos_sim_weight` across every category of `set`.
///
/// Entities already answered are skipped (they are dropped again per
/// category before relevance scoring); entities whose similarity request
/// failed are removed outright.
pub(crate) async fn populate_similarity_weights<E: EmbeddingClient>(
    set: &mut NamedEntitySet,
    all_answered: &[AnswerInfo],
    embedding: &E,
    concurrency: usize,
) {
    let answered = joined_answered_text(all_answered);

    let mut requested: HashSet<String> = HashSet::new();
    let mut texts: Vec<String> = Vec::new();
    for map in [&set.people, &set.acronyms, &set.family, &set.places] {
        for entity in map.iter() {
            if !answered.contains(&entity.text) && requested.insert(entity.text.clone()) {
                texts.push(entity.text.clone());
            }
        }
    }
    if texts.is_empty() {
        return;
    }

    debug!(entities = texts.len(), concurrency, "scoring entity similarity");
    let merged = similarity_weights(embedding, &set.corpus_text, texts, concurrency).await;

    for map in [
        &mut set.people,
        &mut set.acronyms,
        &mut set.family,
        &mut set.places,
    ] {
        for entity in map.iter_mut() {
            if let Some(score) = merged.get(&entity.text) {
                entity.cos_sim_weight = *score;
            }
        }
        map.retain(|e| !requested.contains(&e.text) || merged.contains_key(&e.text));
    }
}

/// Applies relevance adjustments to every entity in one category.
///
/// Per entity: pop-culture penalty on the span lemma; a hard
/// [`NO_VERB_WEIGHT`] floor when the containing answer has no verb at all;
/// otherwise a dependency-head walk from the span toward a verb, a bonus
/// when that verb's subject is literally "I", a sentence-verb fallback for
/// the recorded verb, and finally the similarity weight itself.
pub(crate) fn check_relevance(
    entities: &mut EntityMap,
    pop_culture: &HashSet<String>,
    subject_bonus: f32,
) {
    for entity in entities.iter_mut() {
        let span_lemma = {
            let lemmas: Vec<&str> = entity.doc.tokens[entity.span_start..entity.span_end]
                .iter()
                .map(|t| t.lemma.as_str())
                .collect();
            lemmas.join(" ")
        };
        if pop_culture.contains(&span_lemma) {
            entity.weight -= 1.0 - entity.cos_sim_weight;
        }

        if !entity.doc.has_verb() {
            entity.weight = NO_VERB_WEIGHT;
            continue;
        }

        let mut index = entity.span_start;
        loop {
            let token = &entity.doc.tokens[index];
            if token.pos == Pos::Verb || token.is_sent_start || token.is_punct {
                break;
            }
            index = token.head;
            let stepped = &entity.doc.tokens[index];
            if stepped.pos == Pos::Verb {
                entity.verb = stepped.text.clone();
                for (_, child) in entity.doc.children_of(index) {
                    if child.dep == DepRel::Nsubj && child.text == "I" {
                        entity.weight += subject_bonus;
                    }
                }
            }
            if index == entity.doc.tokens[index].head {
                break;
            }
        }

        if entity.verb.is_empty() {
            if let Some(verb) = entity.doc.first_verb_in(entity.sentence) {
                entity.verb = verb.text.clone();
            }
        }
        entity.weight += entity.cos_sim_weight;
    }
}
