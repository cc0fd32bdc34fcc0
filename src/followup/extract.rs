//! Named-entity extraction over a mentor's answer corpus.

use std::sync::Arc;

use tracing::debug;

use crate::knowledge::AnswerInfo;
use crate::nlp::{EntityLabel, Parser};

use super::error::FollowupResult;
use super::lexicon::{family_relation, is_excluded};
use super::types::{EntityCategory, EntityMap, EntityObject};

/// Categorized candidate entities mined from one set of answers.
#[derive(Debug, Clone, Default)]
pub struct NamedEntitySet {
    /// Family relations, keyed by canonical relation.
    pub family: EntityMap,
    /// People, keyed by span text.
    pub people: EntityMap,
    /// Places, keyed by span text.
    pub places: EntityMap,
    /// Organizations/acronyms, keyed by span text.
    pub acronyms: EntityMap,
    /// All answer texts joined by single spaces; the similarity reference.
    pub corpus_text: String,
}

impl NamedEntitySet {
    /// Total entities across all categories.
    pub fn len(&self) -> usize {
        self.family.len() + self.people.len() + self.places.len() + self.acronyms.len()
    }

    /// Returns `true` if no entities were extracted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts categorized entities from the given answers.
///
/// Each answer is parsed; sentences are scanned for family-relation tokens
/// (case-sensitive whole-token match) and for named-entity spans. Spans on
/// the exclusion list, or overlapping the mentor's name in either substring
/// direction, are skipped. Within each category the last mention of a text
/// wins.
pub async fn extract_entities<P: Parser>(
    parser: &P,
    answers: &[AnswerInfo],
    mentor_name: &str,
) -> FollowupResult<NamedEntitySet> {
    let mut set = NamedEntitySet {
        corpus_text: answers
            .iter()
            .map(|a| a.answer_text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        ..Default::default()
    };

    for answer in answers {
        let doc = Arc::new(parser.parse(&answer.answer_text).await?);

        for sentence in doc.sentences.iter().copied() {
            for (offset, token) in doc.sentence_tokens(sentence).iter().enumerate() {
                if let Some(canonical) = family_relation(&token.text) {
                    let start = sentence.start + offset;
                    set.family.insert(EntityObject {
                        category: EntityCategory::Family,
                        text: canonical.to_string(),
                        doc: Arc::clone(&doc),
                        sentence,
                        span_start: start,
                        span_end: start + 1,
                        cos_sim_weight: 0.0,
                        weight: 0.0,
                        verb: String::new(),
                    });
                }
            }

            for span in doc.entities_in(sentence) {
                if is_excluded(&span.text) {
                    continue;
                }
                if !mentor_name.is_empty()
                    && (mentor_name.contains(&span.text) || span.text.contains(mentor_name))
                {
                    continue;
                }
                let target = match span.label {
                    EntityLabel::Person => &mut set.people,
                    EntityLabel::Org => &mut set.acronyms,
                    EntityLabel::Gpe | EntityLabel::Loc => &mut set.places,
                    EntityLabel::Other => continue,
                };
                let category = match span.label {
                    EntityLabel::Person => EntityCategory::Person,
                    EntityLabel::Org => EntityCategory::Acronym,
                    _ => EntityCategory::Place,
                };
                target.insert(EntityObject {
                    category,
                    text: span.text.clone(),
                    doc: Arc::clone(&doc),
                    sentence,
                    span_start: span.start,
                    span_end: span.end,
                    cos_sim_weight: 0.0,
                    weight: 0.0,
                    verb: String::new(),
                });
            }
        }
    }

    debug!(
        family = set.family.len(),
        people = set.people.len(),
        places = set.places.len(),
        acronyms = set.acronyms.len(),
        "entities extracted"
    );
    Ok(set)
}
