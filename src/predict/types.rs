use serde::Serialize;

use crate::knowledge::{AnswerMedia, ClassificationKind, ExternalVideoIds};

/// Options for one prediction call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictOptions {
    /// Skips the canned exact/paraphrase lookup and always classifies.
    pub canned_match_disabled: bool,
}

/// Result of classifying one user question.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Id of the matched question, when the answer maps back to one.
    pub question_id: Option<String>,
    /// Id of the returned answer.
    pub answer_id: String,
    /// Answer transcript.
    pub answer_text: String,
    /// Rich-text transcript.
    pub answer_markdown: String,
    /// Media renditions for the answer.
    pub answer_media: AnswerMedia,
    /// External hosting ids for the answer video.
    pub external_video_ids: ExternalVideoIds,
    /// Decision-score confidence (1.0 for canned matches).
    pub confidence: f32,
    /// Id of the recorded feedback row, when the write succeeded.
    pub feedback_id: Option<String>,
    /// How the answer was resolved.
    pub kind: ClassificationKind,
    /// The classifier predicted a label with no playable answer.
    pub answer_missing: bool,
}
