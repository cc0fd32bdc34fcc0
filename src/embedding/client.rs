//! Sentence-encoder service access.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::{EmbeddingError, EmbeddingResult};

/// One pairwise paraphrase score over an input sentence list.
///
/// Indices refer to positions in the list passed to
/// [`EmbeddingClient::paraphrase_scores`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ParaphrasePair {
    /// Paraphrase score for the pair.
    pub score: f32,
    /// Index of the first sentence.
    pub first: usize,
    /// Index of the second sentence.
    pub second: usize,
}

/// Capability contract over the embedding/similarity service.
pub trait EmbeddingClient: Send + Sync {
    /// Encodes a text into an embedding vector.
    fn encode(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = EmbeddingResult<Vec<f32>>> + Send;

    /// Cosine-similarity score between two texts.
    fn similarity(
        &self,
        a: &str,
        b: &str,
    ) -> impl std::future::Future<Output = EmbeddingResult<f32>> + Send;

    /// Pairwise paraphrase scores over a sentence list.
    fn paraphrase_scores(
        &self,
        sentences: &[String],
    ) -> impl std::future::Future<Output = EmbeddingResult<Vec<ParaphrasePair>>> + Send;
}

#[derive(Debug, Deserialize)]
struct EncodeResponse {
    encoding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct CosSimResponse {
    cos_sim_weight: f32,
}

#[derive(Debug, Deserialize)]
struct ParaphraseResponse {
    pairs: Vec<(f32, usize, usize)>,
}

/// HTTP client for the SBERT encoder service.
#[derive(Debug, Clone)]
pub struct SbertClient {
    client: reqwest::Client,
    endpoint: String,
    api_secret: Option<String>,
}

impl SbertClient {
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

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_secret {
            Some(secret) => request.header("Authorization", format!("Bearer {}", secret)),
            None => request,
        }
    }
}

impl EmbeddingClient for SbertClient {
    async fn encode(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let request = self
            .client
            .get(format!("{}/encode", self.endpoint))
            .query(&[("query", text)]);

        let response = self.authorize(request).send().await?.error_for_status()?;
        let body: EncodeResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: format!("encode: {}", e),
                })?;

        if body.encoding.is_empty() {
            return Err(EmbeddingError::InvalidResponse {
                reason: "encode returned an empty vector".to_string(),
            });
        }

        debug!(dim = body.encoding.len(), "question encoded");
        Ok(body.encoding)
    }

    async fn similarity(&self, a: &str, b: &str) -> EmbeddingResult<f32> {
        let request = self
            .client
            .post(format!("{}/encode/cos_sim_weight", self.endpoint))
            .json(&json!({ "a": a, "b": b }));

        let response = self.authorize(request).send().await?.error_for_status()?;
        let body: CosSimResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: format!("cos_sim_weight: {}", e),
                })?;

        Ok(body.cos_sim_weight)
    }

    async fn paraphrase_scores(&self, sentences: &[String]) -> EmbeddingResult<Vec<ParaphrasePair>> {
        let request = self
            .client
            .post(format!("{}/paraphrase", self.endpoint))
            .json(&json!({ "sentences": sentences }));

        let response = self.authorize(request).send().await?.error_for_status()?;
        let body: ParaphraseResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: format!("paraphrase: {}", e),
                })?;

        Ok(body
            .pairs
            .into_iter()
            .map(|(score, first, second)| ParaphrasePair {
                score,
                first,
                second,
            })
            .collect())
    }
}
