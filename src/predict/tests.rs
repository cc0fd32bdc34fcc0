use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::*;
use crate::config::Config;
use crate::embedding::MockEmbeddingClient;
use crate::knowledge::types::{GraphAnswer, GraphQuestion, QuestionRef, QuestionTopics};
use crate::knowledge::{
    AnswerStatus, ClassificationKind, MentorGraph, MockKnowledgeStore, OFF_TOPIC_UTTERANCE,
    QuestionKind,
};
use crate::model::{LinearClassifier, MockModelStore};

const MENTOR: &str = "clint";

fn qa_answer(
    answer_id: &str,
    question_id: &str,
    question_text: &str,
    paraphrases: &[&str],
    transcript: &str,
) -> GraphAnswer {
    GraphAnswer {
        id: answer_id.to_string(),
        status: AnswerStatus::Complete,
        transcript: transcript.to_string(),
        markdown_transcript: format!("**{}**", transcript),
        question: GraphQuestion {
            id: question_id.to_string(),
            question: question_text.to_string(),
            kind: QuestionKind::Question,
            name: String::new(),
            paraphrases: paraphrases.iter().map(|p| p.to_string()).collect(),
        },
        web_media: None,
        mobile_media: None,
        vtt_media: None,
        external_video_ids: Default::default(),
    }
}

fn utterance(answer_id: &str, transcript: &str) -> GraphAnswer {
    GraphAnswer {
        id: answer_id.to_string(),
        status: AnswerStatus::Complete,
        transcript: transcript.to_string(),
        markdown_transcript: transcript.to_string(),
        question: GraphQuestion {
            id: format!("q_{}", answer_id),
            question: String::new(),
            kind: QuestionKind::Utterance,
            name: OFF_TOPIC_UTTERANCE.to_string(),
            paraphrases: Vec::new(),
        },
        web_media: None,
        mobile_media: None,
        vtt_media: None,
        external_video_ids: Default::default(),
    }
}

fn link(question_id: &str) -> QuestionTopics {
    QuestionTopics {
        question: QuestionRef {
            id: question_id.to_string(),
        },
        topics: Vec::new(),
    }
}

fn test_graph(with_utterances: bool) -> MentorGraph {
    let mut answers = vec![
        qa_answer(
            "A1",
            "Q1",
            "What is your name?",
            &["Who are you?"],
            "Clint Anderson",
        ),
        qa_answer("A2", "Q2", "How old are you?", &[], "37 years old"),
    ];
    if with_utterances {
        answers.push(utterance("U1", "I can't answer that."));
        answers.push(utterance("U2", "Ask me something else."));
    }
    MentorGraph {
        name: "Clint".to_string(),
        questions: vec![link("Q1"), link("Q2")],
        answers,
        ..Default::default()
    }
}

fn test_model() -> LinearClassifier {
    // Labels include A3 with no recorded answer, for the missing-answer path.
    LinearClassifier::new(
        vec!["A1".to_string(), "A2".to_string(), "A3".to_string()],
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        vec![0.0, 0.0, 0.0],
    )
    .unwrap()
}

struct Fixture {
    pipeline: PredictionPipeline<MockModelStore, MockKnowledgeStore, MockEmbeddingClient>,
    knowledge: Arc<MockKnowledgeStore>,
    embedding: Arc<MockEmbeddingClient>,
}

fn fixture(with_utterances: bool) -> Fixture {
    let store = Arc::new(MockModelStore::new());
    store.set_model(
        MENTOR,
        test_model(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    );

    let knowledge = Arc::new(MockKnowledgeStore::new());
    knowledge.insert_graph(MENTOR, test_graph(with_utterances));

    let embedding = Arc::new(MockEmbeddingClient::new());

    let pipeline = PredictionPipeline::new(
        store,
        Arc::clone(&knowledge),
        Arc::clone(&embedding),
        Config::default(),
    );

    Fixture {
        pipeline,
        knowledge,
        embedding,
    }
}

async fn evaluate(fixture: &Fixture, question: &str) -> Prediction {
    fixture
        .pipeline
        .evaluate(
            MENTOR,
            question,
            "session-1",
            &crate::knowledge::AuthContext::anonymous(),
            PredictOptions::default(),
        )
        .await
        .expect("evaluate should succeed")
}

#[tokio::test]
async fn test_exact_match() {
    let f = fixture(true);
    let prediction = evaluate(&f, "What is your name?").await;

    assert_eq!(prediction.kind, ClassificationKind::Exact);
    assert_eq!(prediction.confidence, 1.0);
    assert_eq!(prediction.answer_id, "A1");
    assert_eq!(prediction.answer_text, "Clint Anderson");
    assert_eq!(prediction.answer_markdown, "**Clint Anderson**");
    assert!(prediction.feedback_id.is_some());
    assert_eq!(
        f.embedding.encode_calls(),
        0,
        "canned match must not call the encoder"
    );
}

#[tokio::test]
async fn test_exact_match_survives_messy_input() {
    let f = fixture(true);
    let prediction = evaluate(&f, "  WHAT is your\u{00a0}name?!  ").await;

    assert_eq!(prediction.kind, ClassificationKind::Exact);
    assert_eq!(prediction.confidence, 1.0);
    assert_eq!(f.embedding.encode_calls(), 0);
}

#[tokio::test]
async fn test_paraphrase_match() {
    let f = fixture(true);
    let prediction = evaluate(&f, "Who are you?").await;

    assert_eq!(prediction.kind, ClassificationKind::Paraphrase);
    assert_eq!(prediction.confidence, 1.0);
    assert_eq!(prediction.answer_id, "A1");
    assert_eq!(f.embedding.encode_calls(), 0);

    let log = f.knowledge.feedback_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, ClassificationKind::Paraphrase);
    assert_eq!(log[0].session_id, "session-1");
}

#[tokio::test]
async fn test_classifier_path() {
    let f = fixture(true);
    f.embedding
        .set_encoding("What's your age then?", vec![0.0, 5.0, 0.0]);

    let prediction = evaluate(&f, "What's your age then?").await;

    assert_eq!(prediction.kind, ClassificationKind::Classifier);
    assert_eq!(prediction.answer_id, "A2");
    assert_eq!(prediction.answer_text, "37 years old");
    assert_eq!(prediction.question_id.as_deref(), Some("Q2"));
    assert_eq!(prediction.confidence, 5.0);
    assert!(!prediction.answer_missing);
    assert_eq!(f.embedding.encode_calls(), 1);
}

#[tokio::test]
async fn test_canned_match_disabled_goes_to_classifier() {
    let f = fixture(true);
    f.embedding
        .set_encoding("What is your name?", vec![4.0, 0.0, 0.0]);

    let prediction = f
        .pipeline
        .evaluate(
            MENTOR,
            "What is your name?",
            "session-1",
            &crate::knowledge::AuthContext::anonymous(),
            PredictOptions {
                canned_match_disabled: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(prediction.kind, ClassificationKind::Classifier);
    assert_eq!(prediction.answer_id, "A1");
    assert_eq!(f.embedding.encode_calls(), 1);
}

#[tokio::test]
async fn test_off_topic_substitutes_utterance() {
    let f = fixture(true);
    // Every class scores far below the threshold; argmax is A1.
    f.embedding
        .set_encoding("What is the meaning of life?", vec![-1.0, -2.0, -3.0]);

    let prediction = evaluate(&f, "What is the meaning of life?").await;

    assert_eq!(prediction.kind, ClassificationKind::OffTopic);
    assert_eq!(prediction.confidence, -1.0);
    assert!(
        prediction.answer_id == "U1" || prediction.answer_id == "U2",
        "answer must come from the off-topic utterance set, got {}",
        prediction.answer_id
    );

    // Feedback names the predicted label, not the substituted utterance.
    let log = f.knowledge.feedback_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].answer_id, "A1");
    assert_eq!(log[0].kind, ClassificationKind::OffTopic);
}

#[tokio::test]
async fn test_off_topic_sentinel_when_no_utterances() {
    let f = fixture(false);
    f.embedding
        .set_encoding("What is the meaning of life?", vec![-1.0, -2.0, -3.0]);

    let prediction = evaluate(&f, "What is the meaning of life?").await;

    assert_eq!(prediction.kind, ClassificationKind::OffTopic);
    assert_eq!(prediction.answer_id, OFF_TOPIC_UTTERANCE);
    assert_eq!(prediction.answer_text, OFF_TOPIC_UTTERANCE);
}

#[tokio::test]
async fn test_feedback_failure_does_not_fail_prediction() {
    let f = fixture(true);
    f.knowledge.set_fail_feedback(true);

    let prediction = evaluate(&f, "What is your name?").await;

    assert_eq!(prediction.kind, ClassificationKind::Exact);
    assert_eq!(prediction.answer_id, "A1");
    assert!(prediction.feedback_id.is_none());
}

#[tokio::test]
async fn test_predicted_label_without_answer_is_missing() {
    let f = fixture(true);
    f.embedding
        .set_encoding("Something unusual", vec![0.0, 0.0, 6.0]);

    let prediction = evaluate(&f, "Something unusual").await;

    assert_eq!(prediction.kind, ClassificationKind::Classifier);
    assert_eq!(prediction.answer_id, "A3");
    assert!(prediction.answer_missing);
    assert!(prediction.answer_text.is_empty());
}

#[tokio::test]
async fn test_unknown_mentor_is_not_found() {
    let f = fixture(true);
    let err = f
        .pipeline
        .evaluate(
            "nobody",
            "What is your name?",
            "session-1",
            &crate::knowledge::AuthContext::anonymous(),
            PredictOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PredictError::Model(crate::model::ModelError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_warm_loads_without_classifying() {
    let f = fixture(true);
    f.pipeline
        .warm(MENTOR, &crate::knowledge::AuthContext::anonymous())
        .await
        .unwrap();

    f.pipeline.cache().run_pending_tasks();
    assert_eq!(f.pipeline.cache().len(), 1);
    assert_eq!(f.embedding.encode_calls(), 0);
    assert_eq!(f.knowledge.feedback_count(), 0);
}
