//! Typed records for mentor knowledge data.
//!
//! The knowledge base returns a loosely-shaped graph; everything here pins
//! that shape down into tagged structs with explicit optional fields.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Utterance category used for below-threshold fallback answers.
pub const OFF_TOPIC_UTTERANCE: &str = "_OFF_TOPIC_";

/// A single media rendition attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Media kind, e.g. `video` or `subtitles`.
    #[serde(rename = "type")]
    pub media_type: String,
    /// Target surface, e.g. `web` or `mobile`.
    pub tag: String,
    /// Location of the asset.
    pub url: String,
}

/// Media renditions for an answer, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMedia {
    /// Web video rendition.
    pub web: Option<Media>,
    /// Mobile video rendition.
    pub mobile: Option<Media>,
    /// Caption (VTT) track.
    pub captions: Option<Media>,
}

impl AnswerMedia {
    /// Returns `true` if no rendition is present.
    pub fn is_empty(&self) -> bool {
        self.web.is_none() && self.mobile.is_none() && self.captions.is_none()
    }
}

/// External hosting ids for an answer's video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalVideoIds {
    /// Wistia video id, when the answer is mirrored there.
    #[serde(rename = "wistiaId")]
    pub wistia_id: Option<String>,
}

/// Lifecycle status of a recorded answer.
///
/// Only [`AnswerStatus::Complete`] answers participate in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerStatus {
    Complete,
    Incomplete,
    Skip,
}

/// Kind of the question a recording answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    /// A subject-matter question eligible for classification.
    Question,
    /// A canned utterance grouped by category name (e.g. `_OFF_TOPIC_`).
    Utterance,
}

/// A matchable question with its recorded answer.
///
/// Built once per mentor load and shared immutably between the index maps;
/// a mentor reload produces a fresh set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    /// Question id in the knowledge base.
    pub id: String,
    /// Canonical question text.
    pub question_text: String,
    /// Alternate phrasings that resolve to the same answer.
    pub paraphrases: Vec<String>,
    /// Id of the recorded answer.
    pub answer_id: String,
    /// Answer transcript.
    pub answer_text: String,
    /// Rich-text transcript.
    pub markdown_answer: String,
    /// Media renditions for the answer.
    pub media: AnswerMedia,
    /// External hosting ids for the answer video.
    pub external_video_ids: ExternalVideoIds,
    /// Topic tags attached through the mentor's subject graph.
    pub topics: Vec<String>,
}

/// A recorded answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    /// Answer id in the knowledge base.
    pub id: String,
    /// Transcript text.
    pub transcript: String,
    /// Rich-text transcript.
    pub markdown_transcript: String,
    /// Media renditions.
    pub media: AnswerMedia,
    /// External hosting ids.
    pub external_video_ids: ExternalVideoIds,
    /// Lifecycle status.
    pub status: AnswerStatus,
}

/// Question/answer text pair used by the follow-up generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerInfo {
    /// Text of the answered question.
    #[serde(rename = "questionText")]
    pub question_text: String,
    /// Transcript of the answer.
    #[serde(rename = "answerText")]
    pub answer_text: String,
}

/// A named subject or topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    /// Display name.
    pub name: String,
}

/// Nested question data on a graph answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQuestion {
    /// Question id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Question text.
    pub question: String,
    /// Question kind.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Utterance category name (empty for regular questions).
    #[serde(default)]
    pub name: String,
    /// Alternate phrasings.
    #[serde(default)]
    pub paraphrases: Vec<String>,
}

/// An answer as returned by the mentor graph query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAnswer {
    /// Answer id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Lifecycle status.
    pub status: AnswerStatus,
    /// Transcript text.
    #[serde(default)]
    pub transcript: String,
    /// Rich-text transcript.
    #[serde(rename = "markdownTranscript", default)]
    pub markdown_transcript: String,
    /// The question this answer records.
    pub question: GraphQuestion,
    /// Web video rendition.
    #[serde(rename = "webMedia")]
    pub web_media: Option<Media>,
    /// Mobile video rendition.
    #[serde(rename = "mobileMedia")]
    pub mobile_media: Option<Media>,
    /// Caption track.
    #[serde(rename = "vttMedia")]
    pub vtt_media: Option<Media>,
    /// External hosting ids.
    #[serde(rename = "externalVideoIds", default)]
    pub external_video_ids: ExternalVideoIds,
}

impl GraphAnswer {
    /// Collects the media renditions into an [`AnswerMedia`].
    pub fn media(&self) -> AnswerMedia {
        AnswerMedia {
            web: self.web_media.clone(),
            mobile: self.mobile_media.clone(),
            captions: self.vtt_media.clone(),
        }
    }
}

/// Topic links for one question in the mentor graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTopics {
    /// The linked question.
    pub question: QuestionRef,
    /// Topics attached to it.
    #[serde(default)]
    pub topics: Vec<NamedItem>,
}

/// Reference to a question by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRef {
    /// Question id.
    #[serde(rename = "_id")]
    pub id: String,
}

/// A curator-maintained mapping from a specific phrasing to a question.
///
/// Checked before the regular question-text map during canned lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualMapping {
    /// The phrasing to intercept.
    #[serde(rename = "questionText")]
    pub question_text: String,
    /// Id of the question it resolves to.
    #[serde(rename = "questionId")]
    pub question_id: String,
}

/// A user question the mentor graded but never matched to a recording.
///
/// Consumed as part of the graph contract; training is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuestion {
    /// The question as asked.
    pub question: String,
    /// Answer id the mentor graded it against, if any.
    #[serde(rename = "graderAnswer", default)]
    pub grader_answer_id: Option<String>,
}

/// Everything the knowledge base returns for one mentor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorGraph {
    /// Mentor display name.
    #[serde(default)]
    pub name: String,
    /// Subjects the mentor covers.
    #[serde(default)]
    pub subjects: Vec<NamedItem>,
    /// Topics the mentor covers.
    #[serde(default)]
    pub topics: Vec<NamedItem>,
    /// Topic links per question.
    #[serde(default)]
    pub questions: Vec<QuestionTopics>,
    /// Recorded answers with their nested questions.
    #[serde(default)]
    pub answers: Vec<GraphAnswer>,
    /// Curator-maintained phrasing overrides.
    #[serde(rename = "manualQuestionMappings", default)]
    pub manual_question_mappings: Vec<ManualMapping>,
    /// Graded-but-unmatched user questions.
    #[serde(rename = "userQuestions", default)]
    pub user_questions: Vec<UserQuestion>,
}

/// How a prediction resolved its answer.
///
/// Recorded with every feedback write so curators can see which path
/// produced each answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationKind {
    /// Normalized input equals a stored canonical question text.
    Exact,
    /// Normalized input equals a stored paraphrase.
    Paraphrase,
    /// The trained classifier picked the answer.
    Classifier,
    /// Confidence fell below the threshold; an off-topic utterance was substituted.
    OffTopic,
}

impl ClassificationKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationKind::Exact => "EXACT",
            ClassificationKind::Paraphrase => "PARAPHRASE",
            ClassificationKind::Classifier => "CLASSIFIER",
            ClassificationKind::OffTopic => "OFF_TOPIC",
        }
    }
}

impl std::fmt::Display for ClassificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller identity forwarded to the knowledge base.
///
/// Token parsing and policy live outside this crate; only the raw header
/// value passes through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Raw `Authorization` header value, if the caller sent one.
    pub authorization: Option<String>,
}

impl AuthContext {
    /// An unauthenticated context.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context carrying a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            authorization: Some(format!("Bearer {}", token.into())),
        }
    }
}

/// One feedback write for a classified user question.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    /// Mentor the question was asked of.
    pub mentor_id: String,
    /// The question exactly as asked.
    pub question: String,
    /// Answer id the pipeline matched (the predicted id, even when the
    /// response substituted an off-topic utterance).
    pub answer_id: String,
    /// How the answer was resolved.
    pub kind: ClassificationKind,
    /// Confidence of the match.
    pub confidence: f32,
    /// Chat session the question belongs to.
    pub session_id: String,
}

/// Shared handle to a question record.
pub type QuestionRecordRef = Arc<QuestionRecord>;

/// Shared handle to an answer record.
pub type AnswerRecordRef = Arc<AnswerRecord>;
