//! In-memory [`KnowledgeStore`] for tests.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::client::KnowledgeStore;
use super::error::{KnowledgeError, KnowledgeResult};
use super::types::{AnswerInfo, AuthContext, Feedback, MentorGraph};

/// Mock knowledge store backed by hash maps, with a recorded feedback log
/// and a failure toggle for the feedback path.
#[derive(Default)]
pub struct MockKnowledgeStore {
    graphs: RwLock<HashMap<String, MentorGraph>>,
    category_answers: RwLock<HashMap<String, Vec<AnswerInfo>>>,
    answered: RwLock<Vec<AnswerInfo>>,
    mentor_name: RwLock<String>,
    feedback_log: RwLock<Vec<Feedback>>,
    fail_feedback: RwLock<bool>,
    editable: RwLock<bool>,
}

impl MockKnowledgeStore {
    pub fn new() -> Self {
        Self {
            editable: RwLock::new(true),
            ..Default::default()
        }
    }

    /// Registers a mentor graph.
    pub fn insert_graph(&self, mentor_id: &str, graph: MentorGraph) {
        self.graphs.write().insert(mentor_id.to_string(), graph);
    }

    /// Sets the authenticated mentor's answered questions and name.
    pub fn set_answered(&self, answered: Vec<AnswerInfo>, name: &str) {
        *self.answered.write() = answered;
        *self.mentor_name.write() = name.to_string();
    }

    /// Registers category-scoped answers.
    pub fn insert_category(&self, category: &str, answers: Vec<AnswerInfo>) {
        self.category_answers
            .write()
            .insert(category.to_string(), answers);
    }

    /// Makes every subsequent feedback write fail.
    pub fn set_fail_feedback(&self, fail: bool) {
        *self.fail_feedback.write() = fail;
    }

    /// Sets the outcome of `can_edit_mentor`.
    pub fn set_editable(&self, editable: bool) {
        *self.editable.write() = editable;
    }

    /// Returns all feedback recorded so far.
    pub fn feedback_log(&self) -> Vec<Feedback> {
        self.feedback_log.read().clone()
    }

    /// Number of feedback writes recorded.
    pub fn feedback_count(&self) -> usize {
        self.feedback_log.read().len()
    }
}

impl KnowledgeStore for MockKnowledgeStore {
    async fn fetch_mentor_graph(
        &self,
        mentor_id: &str,
        _auth: &AuthContext,
    ) -> KnowledgeResult<MentorGraph> {
        self.graphs
            .read()
            .get(mentor_id)
            .cloned()
            .ok_or_else(|| KnowledgeError::MentorNotFound {
                mentor_id: mentor_id.to_string(),
            })
    }

    async fn fetch_mentor_answers_and_name(
        &self,
        _auth: &AuthContext,
    ) -> KnowledgeResult<(Vec<AnswerInfo>, String)> {
        Ok((self.answered.read().clone(), self.mentor_name.read().clone()))
    }

    async fn fetch_category_answers(
        &self,
        category: &str,
        _auth: &AuthContext,
    ) -> KnowledgeResult<Vec<AnswerInfo>> {
        Ok(self
            .category_answers
            .read()
            .get(category)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_feedback(
        &self,
        feedback: &Feedback,
        _auth: &AuthContext,
    ) -> KnowledgeResult<String> {
        if *self.fail_feedback.read() {
            return Err(KnowledgeError::GraphQl {
                message: "injected feedback failure".to_string(),
            });
        }
        self.feedback_log.write().push(feedback.clone());
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn can_edit_mentor(
        &self,
        _mentor_id: &str,
        _auth: &AuthContext,
    ) -> KnowledgeResult<bool> {
        Ok(*self.editable.read())
    }
}
