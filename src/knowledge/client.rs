//! Knowledge base access.
//!
//! [`KnowledgeStore`] is the consumed contract; [`GraphQlKnowledgeStore`]
//! speaks the production GraphQL wire shape over HTTP.

use serde_json::{Value, json};
use tracing::debug;

use super::error::{KnowledgeError, KnowledgeResult};
use super::types::{AnswerInfo, AuthContext, Feedback, MentorGraph};

const QUERY_MENTOR: &str = "\
query Mentor($id: ID!) {
    mentor(id: $id) {
        name
        subjects { name }
        topics { name }
        questions {
            question { _id }
            topics { name }
        }
        answers {
            _id
            status
            transcript
            markdownTranscript
            question { _id question type name paraphrases }
            webMedia { type tag url }
            mobileMedia { type tag url }
            vttMedia { type tag url }
            externalVideoIds { wistiaId }
        }
        manualQuestionMappings { questionText questionId }
        userQuestions { question graderAnswer }
    }
}";

const QUERY_MENTOR_ANSWERS_AND_NAME: &str = "\
query Mentor {
    me {
        mentor {
            name
            answers {
                question { question }
                transcript
            }
        }
    }
}";

const QUERY_CATEGORY_ANSWERS: &str = "\
query CategoryAnswers($category: String!) {
    me {
        categoryAnswers(category: $category) {
            answerText
            questionText
        }
    }
}";

const QUERY_CAN_EDIT_MENTOR: &str = "\
query CanEditMentor($mentor: ID!) {
    me {
        canEditMentor(mentor: $mentor)
    }
}";

const MUTATION_CREATE_USER_QUESTION: &str = "\
mutation UserQuestionCreate($userQuestion: UserQuestionCreateInput!) {
    userQuestionCreate(userQuestion: $userQuestion) {
        _id
    }
}";

/// Capability contract over the mentor knowledge base.
pub trait KnowledgeStore: Send + Sync {
    /// Fetches the full question/answer/media graph for one mentor.
    fn fetch_mentor_graph(
        &self,
        mentor_id: &str,
        auth: &AuthContext,
    ) -> impl std::future::Future<Output = KnowledgeResult<MentorGraph>> + Send;

    /// Fetches every answered question of the authenticated mentor, plus
    /// the mentor's display name.
    fn fetch_mentor_answers_and_name(
        &self,
        auth: &AuthContext,
    ) -> impl std::future::Future<Output = KnowledgeResult<(Vec<AnswerInfo>, String)>> + Send;

    /// Fetches the authenticated mentor's answers scoped to one category.
    fn fetch_category_answers(
        &self,
        category: &str,
        auth: &AuthContext,
    ) -> impl std::future::Future<Output = KnowledgeResult<Vec<AnswerInfo>>> + Send;

    /// Records one classified user question; returns the feedback id.
    fn record_feedback(
        &self,
        feedback: &Feedback,
        auth: &AuthContext,
    ) -> impl std::future::Future<Output = KnowledgeResult<String>> + Send;

    /// Whether the caller may edit the given mentor. Policy lives in the
    /// knowledge base; only the outcome is consumed here.
    fn can_edit_mentor(
        &self,
        mentor_id: &str,
        auth: &AuthContext,
    ) -> impl std::future::Future<Output = KnowledgeResult<bool>> + Send;
}

/// GraphQL-backed [`KnowledgeStore`].
#[derive(Debug, Clone)]
pub struct GraphQlKnowledgeStore {
    client: reqwest::Client,
    endpoint: String,
    api_secret: Option<String>,
}

impl GraphQlKnowledgeStore {
    /// Creates a store for `endpoint`, optionally sending `api_secret` as a
    /// bearer token when the caller provides no authorization of their own.
    pub fn new(endpoint: impl Into<String>, api_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_secret,
        }
    }

    /// Configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_query(
        &self,
        query: &'static str,
        variables: Value,
        auth: &AuthContext,
    ) -> KnowledgeResult<Value> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(header) = &auth.authorization {
            request = request.header("Authorization", header);
        } else if let Some(secret) = &self.api_secret {
            request = request.header("Authorization", format!("Bearer {}", secret));
        }

        let response = request.send().await?.error_for_status()?;
        let body: Value = response.json().await?;

        if let Some(errors) = body.get("errors") {
            return Err(KnowledgeError::GraphQl {
                message: errors.to_string(),
            });
        }

        body.get("data")
            .cloned()
            .ok_or_else(|| KnowledgeError::InvalidResponse {
                reason: "response has neither data nor errors".to_string(),
            })
    }
}

impl KnowledgeStore for GraphQlKnowledgeStore {
    async fn fetch_mentor_graph(
        &self,
        mentor_id: &str,
        auth: &AuthContext,
    ) -> KnowledgeResult<MentorGraph> {
        debug!(mentor_id, "fetching mentor graph");
        let data = self
            .post_query(QUERY_MENTOR, json!({ "id": mentor_id }), auth)
            .await?;

        let mentor = data.get("mentor").cloned().unwrap_or(Value::Null);
        if mentor.is_null() {
            return Err(KnowledgeError::MentorNotFound {
                mentor_id: mentor_id.to_string(),
            });
        }

        serde_json::from_value(mentor).map_err(|e| KnowledgeError::InvalidResponse {
            reason: format!("mentor graph: {}", e),
        })
    }

    async fn fetch_mentor_answers_and_name(
        &self,
        auth: &AuthContext,
    ) -> KnowledgeResult<(Vec<AnswerInfo>, String)> {
        let data = self
            .post_query(QUERY_MENTOR_ANSWERS_AND_NAME, json!({}), auth)
            .await?;

        let mentor = data
            .pointer("/me/mentor")
            .cloned()
            .filter(|v| !v.is_null())
            .ok_or_else(|| KnowledgeError::InvalidResponse {
                reason: "me.mentor missing".to_string(),
            })?;

        let name = mentor
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let answers = mentor
            .get("answers")
            .and_then(Value::as_array)
            .map(|answers| {
                answers
                    .iter()
                    .map(|answer| AnswerInfo {
                        question_text: answer
                            .pointer("/question/question")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        answer_text: answer
                            .get("transcript")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok((answers, name))
    }

    async fn fetch_category_answers(
        &self,
        category: &str,
        auth: &AuthContext,
    ) -> KnowledgeResult<Vec<AnswerInfo>> {
        let data = self
            .post_query(QUERY_CATEGORY_ANSWERS, json!({ "category": category }), auth)
            .await?;

        let answers = data
            .pointer("/me/categoryAnswers")
            .cloned()
            .filter(|v| !v.is_null())
            .ok_or_else(|| KnowledgeError::InvalidResponse {
                reason: "me.categoryAnswers missing".to_string(),
            })?;

        serde_json::from_value(answers).map_err(|e| KnowledgeError::InvalidResponse {
            reason: format!("category answers: {}", e),
        })
    }

    async fn record_feedback(
        &self,
        feedback: &Feedback,
        auth: &AuthContext,
    ) -> KnowledgeResult<String> {
        let variables = json!({
            "userQuestion": {
                "mentor": feedback.mentor_id,
                "question": feedback.question,
                "classifierAnswer": feedback.answer_id,
                "classifierAnswerType": feedback.kind.as_str(),
                "confidence": feedback.confidence,
                "chatSessionId": feedback.session_id,
            }
        });

        let data = self
            .post_query(MUTATION_CREATE_USER_QUESTION, variables, auth)
            .await?;

        data.pointer("/userQuestionCreate/_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| KnowledgeError::InvalidResponse {
                reason: "userQuestionCreate._id missing".to_string(),
            })
    }

    async fn can_edit_mentor(
        &self,
        mentor_id: &str,
        auth: &AuthContext,
    ) -> KnowledgeResult<bool> {
        let data = self
            .post_query(QUERY_CAN_EDIT_MENTOR, json!({ "mentor": mentor_id }), auth)
            .await?;

        data.pointer("/me/canEditMentor")
            .and_then(Value::as_bool)
            .ok_or_else(|| KnowledgeError::InvalidResponse {
                reason: "me.canEditMentor missing".to_string(),
            })
    }
}
