//! Per-mentor in-memory knowledge index.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::sanitize::sanitize_string;

use super::types::{
    AnswerRecord, AnswerRecordRef, AnswerStatus, MentorGraph, OFF_TOPIC_UTTERANCE, QuestionKind,
    QuestionRecord, QuestionRecordRef,
};

/// Lookup maps built from one mentor's graph.
///
/// Built once per load and owned by a single classifier-cache entry; a
/// reload replaces the whole index rather than mutating it.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeIndex {
    mentor_name: String,
    topics: Vec<String>,
    question_by_id: HashMap<String, QuestionRecordRef>,
    question_by_text: HashMap<String, QuestionRecordRef>,
    question_by_answer: HashMap<String, QuestionRecordRef>,
    answer_by_id: HashMap<String, AnswerRecordRef>,
    utterances_by_type: HashMap<String, Vec<AnswerRecordRef>>,
    manual_overrides: HashMap<String, QuestionRecordRef>,
}

impl KnowledgeIndex {
    /// Builds the index from a fetched mentor graph.
    ///
    /// Answers that are not `COMPLETE` are skipped. Utterance answers are
    /// grouped by category instead of entering the question maps. Text-map
    /// collisions keep the first phrasing seen (canonical text before
    /// paraphrases, in graph order).
    pub fn from_graph(graph: &MentorGraph) -> Self {
        let mut topics: Vec<String> = Vec::new();
        for subject in &graph.subjects {
            topics.push(subject.name.clone());
        }
        for topic in &graph.topics {
            topics.push(topic.name.clone());
        }

        let mut records: HashMap<String, QuestionRecord> = HashMap::new();
        let mut answer_by_id: HashMap<String, AnswerRecordRef> = HashMap::new();
        let mut utterances_by_type: HashMap<String, Vec<AnswerRecordRef>> = HashMap::new();

        for answer in &graph.answers {
            if answer.status != AnswerStatus::Complete {
                continue;
            }
            let record = Arc::new(AnswerRecord {
                id: answer.id.clone(),
                transcript: answer.transcript.clone(),
                markdown_transcript: answer.markdown_transcript.clone(),
                media: answer.media(),
                external_video_ids: answer.external_video_ids.clone(),
                status: answer.status,
            });
            if answer.question.kind == QuestionKind::Utterance {
                utterances_by_type
                    .entry(answer.question.name.clone())
                    .or_default()
                    .push(record);
                continue;
            }
            answer_by_id.insert(answer.id.clone(), record);
            records.insert(
                answer.question.id.clone(),
                QuestionRecord {
                    id: answer.question.id.clone(),
                    question_text: answer.question.question.clone(),
                    paraphrases: answer.question.paraphrases.clone(),
                    answer_id: answer.id.clone(),
                    answer_text: answer.transcript.clone(),
                    markdown_answer: answer.markdown_transcript.clone(),
                    media: answer.media(),
                    external_video_ids: answer.external_video_ids.clone(),
                    topics: Vec::new(),
                },
            );
        }

        // Topic links decide which questions become matchable at all; a
        // record without a link never enters the text maps.
        let mut linked: Vec<String> = Vec::new();
        for link in &graph.questions {
            if let Some(record) = records.get_mut(&link.question.id) {
                for topic in &link.topics {
                    record.topics.push(topic.name.clone());
                }
                linked.push(link.question.id.clone());
            }
        }

        let question_by_id: HashMap<String, QuestionRecordRef> = records
            .into_iter()
            .map(|(id, record)| (id, Arc::new(record)))
            .collect();

        let mut question_by_text: HashMap<String, QuestionRecordRef> = HashMap::new();
        let mut question_by_answer: HashMap<String, QuestionRecordRef> = HashMap::new();
        for id in &linked {
            let record = match question_by_id.get(id) {
                Some(record) => record,
                None => continue,
            };
            question_by_text
                .entry(sanitize_string(&record.question_text))
                .or_insert_with(|| Arc::clone(record));
            for paraphrase in &record.paraphrases {
                question_by_text
                    .entry(sanitize_string(paraphrase))
                    .or_insert_with(|| Arc::clone(record));
            }
            question_by_answer.insert(sanitize_string(&record.answer_text), Arc::clone(record));
        }

        let mut manual_overrides: HashMap<String, QuestionRecordRef> = HashMap::new();
        for mapping in &graph.manual_question_mappings {
            if let Some(record) = question_by_id.get(&mapping.question_id) {
                manual_overrides.insert(sanitize_string(&mapping.question_text), Arc::clone(record));
            }
        }

        debug!(
            mentor = %graph.name,
            questions = question_by_id.len(),
            matchable = question_by_text.len(),
            utterance_types = utterances_by_type.len(),
            "knowledge index built"
        );

        Self {
            mentor_name: graph.name.clone(),
            topics,
            question_by_id,
            question_by_text,
            question_by_answer,
            answer_by_id,
            utterances_by_type,
            manual_overrides,
        }
    }

    /// Mentor display name.
    pub fn mentor_name(&self) -> &str {
        &self.mentor_name
    }

    /// Subject and topic names, in graph order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Looks up a question record by question id.
    pub fn question_by_id(&self, id: &str) -> Option<&QuestionRecordRef> {
        self.question_by_id.get(id)
    }

    /// Looks up a question record by normalized question/paraphrase text.
    pub fn question_by_text(&self, sanitized: &str) -> Option<&QuestionRecordRef> {
        self.question_by_text.get(sanitized)
    }

    /// Looks up a question record by normalized answer transcript.
    pub fn question_by_answer(&self, sanitized: &str) -> Option<&QuestionRecordRef> {
        self.question_by_answer.get(sanitized)
    }

    /// Looks up an answer record by answer id.
    pub fn answer_by_id(&self, id: &str) -> Option<&AnswerRecordRef> {
        self.answer_by_id.get(id)
    }

    /// Resolves a canned match: manual overrides first, then question text.
    pub fn lookup_canned(&self, sanitized: &str) -> Option<&QuestionRecordRef> {
        self.manual_overrides
            .get(sanitized)
            .or_else(|| self.question_by_text.get(sanitized))
    }

    /// Utterance answers for a category.
    pub fn utterances(&self, category: &str) -> Option<&[AnswerRecordRef]> {
        self.utterances_by_type.get(category).map(Vec::as_slice)
    }

    /// Off-topic utterance answers, if the mentor recorded any.
    pub fn off_topic_utterances(&self) -> Option<&[AnswerRecordRef]> {
        self.utterances(OFF_TOPIC_UTTERANCE)
    }

    /// Number of matchable questions.
    pub fn question_count(&self) -> usize {
        self.question_by_id.len()
    }
}
