//! Entity and follow-up value types.

use std::sync::Arc;

use serde::Serialize;

use crate::nlp::{Document, Sentence};

/// Category a mined entity falls into; each has one question template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    /// Family relations, canonicalized (`mom` → `mother`).
    Family,
    /// People's names.
    Person,
    /// Places (geopolitical entities and locations).
    Place,
    /// Organizations, which typically surface as acronyms.
    Acronym,
}

impl EntityCategory {
    /// Category name used in output payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Family => "family",
            EntityCategory::Person => "person",
            EntityCategory::Place => "place",
            EntityCategory::Acronym => "acronym",
        }
    }

    /// Substitutes an entity into this category's question template.
    pub fn template(&self, entity_text: &str) -> String {
        match self {
            EntityCategory::Family => {
                format!("Can you tell me more about your {}?", entity_text)
            }
            EntityCategory::Person => format!("Can you tell me more about {}?", entity_text),
            EntityCategory::Place => format!("What was {} like?", entity_text),
            EntityCategory::Acronym => format!("What is {}?", entity_text),
        }
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate entity mined from a mentor's answers.
///
/// Lives only for the duration of a generation pass.
#[derive(Debug, Clone)]
pub struct EntityObject {
    /// Category the entity was extracted under.
    pub category: EntityCategory,
    /// Entity text (canonical relation for family entities).
    pub text: String,
    /// Parsed document of the containing answer.
    pub doc: Arc<Document>,
    /// Sentence the entity occurred in.
    pub sentence: Sentence,
    /// First token of the entity span, as a document index.
    pub span_start: usize,
    /// One past the last token of the span.
    pub span_end: usize,
    /// Similarity of the entity to the full answer corpus.
    pub cos_sim_weight: f32,
    /// Running relevance weight.
    pub weight: f32,
    /// Governing verb text, when one was found.
    pub verb: String,
}

/// A generated follow-up question, ready for ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowupQuestion {
    /// The generated question text.
    pub question: String,
    /// Entity the question was templated from.
    #[serde(rename = "entityType")]
    pub entity: String,
    /// Template category used.
    pub template: EntityCategory,
    /// Relevance weight of the source entity.
    pub weight: f32,
    /// Governing verb of the source entity, if any.
    pub verb: String,
}

/// Insertion-ordered entity map keyed by entity text.
///
/// Re-inserting an existing key replaces the value in place, preserving the
/// original position; iteration follows insertion order, which downstream
/// stable sorting relies on for ties.
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
    entries: Vec<EntityObject>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by entity text.
    pub fn insert(&mut self, entity: EntityObject) {
        match self.entries.iter_mut().find(|e| e.text == entity.text) {
            Some(slot) => *slot = entity,
            None => self.entries.push(entity),
        }
    }

    /// Looks up an entity by text.
    pub fn get(&self, text: &str) -> Option<&EntityObject> {
        self.entries.iter().find(|e| e.text == text)
    }

    /// Keeps only entities matching the predicate, preserving order.
    pub fn retain(&mut self, f: impl FnMut(&EntityObject) -> bool) {
        self.entries.retain(f);
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityObject> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EntityObject> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Insertion-ordered follow-up map keyed by generated question text.
#[derive(Debug, Clone, Default)]
pub struct FollowupList {
    entries: Vec<FollowupQuestion>,
}

impl FollowupList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by question text, preserving position on replace.
    pub fn insert(&mut self, followup: FollowupQuestion) {
        match self
            .entries
            .iter_mut()
            .find(|f| f.question == followup.question)
        {
            Some(slot) => *slot = followup,
            None => self.entries.push(followup),
        }
    }

    /// Looks up a follow-up by question text.
    pub fn get(&self, question: &str) -> Option<&FollowupQuestion> {
        self.entries.iter().find(|f| f.question == question)
    }

    /// Returns `true` if a follow-up with this question text is present.
    pub fn contains(&self, question: &str) -> bool {
        self.get(question).is_some()
    }

    /// Removes a follow-up by question text, preserving the order of the rest.
    pub fn remove(&mut self, question: &str) -> Option<FollowupQuestion> {
        let index = self.entries.iter().position(|f| f.question == question)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FollowupQuestion> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the list, sorted by descending weight. The sort is stable,
    /// so equal weights keep insertion order.
    pub fn into_sorted(mut self) -> Vec<FollowupQuestion> {
        self.entries.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.entries
    }
}
