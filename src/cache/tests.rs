use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use super::*;
use crate::knowledge::types::{GraphAnswer, GraphQuestion, QuestionRef, QuestionTopics};
use crate::knowledge::{AnswerStatus, MentorGraph, MockKnowledgeStore, QuestionKind};
use crate::model::{LinearClassifier, MockModelStore};

fn simple_graph(mentor_name: &str) -> MentorGraph {
    MentorGraph {
        name: mentor_name.to_string(),
        questions: vec![QuestionTopics {
            question: QuestionRef {
                id: "Q1".to_string(),
            },
            topics: Vec::new(),
        }],
        answers: vec![GraphAnswer {
            id: "A1".to_string(),
            status: AnswerStatus::Complete,
            transcript: "An answer".to_string(),
            markdown_transcript: "An answer".to_string(),
            question: GraphQuestion {
                id: "Q1".to_string(),
                question: "A question?".to_string(),
                kind: QuestionKind::Question,
                name: String::new(),
                paraphrases: Vec::new(),
            },
            web_media: None,
            mobile_media: None,
            vtt_media: None,
            external_video_ids: Default::default(),
        }],
        ..Default::default()
    }
}

fn simple_model() -> LinearClassifier {
    LinearClassifier::new(
        vec!["A1".to_string(), "A2".to_string(), "A3".to_string()],
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]],
        vec![0.0, 0.0, 0.0],
    )
    .unwrap()
}

fn fixture(mentor_id: &str) -> (Arc<MockModelStore>, Arc<MockKnowledgeStore>) {
    let store = Arc::new(MockModelStore::new());
    store.set_model(
        mentor_id,
        simple_model(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    );

    let knowledge = Arc::new(MockKnowledgeStore::new());
    knowledge.insert_graph(mentor_id, simple_graph("Clint"));

    (store, knowledge)
}

#[tokio::test]
async fn test_get_loads_model_and_index() {
    let (store, knowledge) = fixture("clint");
    let cache = ClassifierCache::new(Arc::clone(&store), knowledge);

    let mentor = cache.get("clint", &AuthContext::anonymous()).await.unwrap();
    assert_eq!(mentor.mentor_id(), "clint");
    assert_eq!(mentor.index().mentor_name(), "Clint");
    assert!(mentor.index().question_by_text("a question").is_some());
    assert_eq!(store.load_count("clint"), 1);
}

#[tokio::test]
async fn test_unchanged_artifact_does_not_reload() {
    let (store, knowledge) = fixture("clint");
    let cache = ClassifierCache::new(Arc::clone(&store), knowledge);
    let auth = AuthContext::anonymous();

    let first = cache.get("clint", &auth).await.unwrap();
    let second = cache.get("clint", &auth).await.unwrap();

    assert_eq!(store.load_count("clint"), 1, "second get must be a cache hit");
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_newer_artifact_triggers_reload() {
    let (store, knowledge) = fixture("clint");
    let cache = ClassifierCache::new(Arc::clone(&store), knowledge);
    let auth = AuthContext::anonymous();

    let first = cache.get("clint", &auth).await.unwrap();

    let retrained = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(1);
    store.touch("clint", retrained);

    let second = cache.get("clint", &auth).await.unwrap();
    assert_eq!(store.load_count("clint"), 2, "stale entry must reload");
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_missing_model_is_not_found() {
    let store = Arc::new(MockModelStore::new());
    let knowledge = Arc::new(MockKnowledgeStore::new());
    let cache = ClassifierCache::new(store, knowledge);

    let err = cache
        .get("nobody", &AuthContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CacheError::Model(crate::model::ModelError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_capacity_is_bounded() {
    let store = Arc::new(MockModelStore::new());
    let knowledge = Arc::new(MockKnowledgeStore::new());
    let trained_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for mentor_id in ["m1", "m2", "m3"] {
        store.set_model(mentor_id, simple_model(), trained_at);
        knowledge.insert_graph(mentor_id, simple_graph(mentor_id));
    }

    let cache = ClassifierCache::with_capacity(store, knowledge, 2);
    let auth = AuthContext::anonymous();
    for mentor_id in ["m1", "m2", "m3"] {
        cache.get(mentor_id, &auth).await.unwrap();
    }

    cache.run_pending_tasks();
    assert!(cache.len() <= 2, "cache must evict down to capacity");
}

#[tokio::test]
async fn test_invalidate_forces_reload() {
    let (store, knowledge) = fixture("clint");
    let cache = ClassifierCache::new(Arc::clone(&store), knowledge);
    let auth = AuthContext::anonymous();

    cache.get("clint", &auth).await.unwrap();
    cache.invalidate("clint");
    cache.get("clint", &auth).await.unwrap();

    assert_eq!(store.load_count("clint"), 2);
}
