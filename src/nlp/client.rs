//! Sentence/entity parser access.

use serde_json::json;
use tracing::debug;

use super::error::{ParseError, ParseResult};
use super::types::Document;

/// Capability contract over the sentence/entity parser.
pub trait Parser: Send + Sync {
    /// Parses a text into sentences, dependency arcs and entity spans.
    fn parse(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = ParseResult<Document>> + Send;
}

/// HTTP client for the parser service.
#[derive(Debug, Clone)]
pub struct HttpParser {
    client: reqwest::Client,
    endpoint: String,
    api_secret: Option<String>,
}

impl HttpParser {
    /// Creates a client for the service at `endpoint`.
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
}

impl Parser for HttpParser {
    async fn parse(&self, text: &str) -> ParseResult<Document> {
        let mut request = self
            .client
            .post(format!("{}/parse", self.endpoint))
            .json(&json!({ "text": text }));

        if let Some(secret) = &self.api_secret {
            request = request.header("Authorization", format!("Bearer {}", secret));
        }

        let response = request.send().await?.error_for_status()?;
        let document: Document =
            response
                .json()
                .await
                .map_err(|e| ParseError::InvalidResponse {
                    reason: format!("parse: {}", e),
                })?;

        document
            .validate()
            .map_err(|reason| ParseError::InvalidResponse { reason })?;

        debug!(
            tokens = document.tokens.len(),
            sentences = document.sentences.len(),
            entities = document.entities.len(),
            "text parsed"
        );
        Ok(document)
    }
}
