//! In-memory [`EmbeddingClient`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::client::{EmbeddingClient, ParaphrasePair};
use super::error::{EmbeddingError, EmbeddingResult};

/// Mock embedding client with scripted encodings, similarity scores and
/// paraphrase pairs, plus call counters and per-text failure injection.
#[derive(Default)]
pub struct MockEmbeddingClient {
    encodings: RwLock<HashMap<String, Vec<f32>>>,
    similarities: RwLock<HashMap<String, f32>>,
    paraphrase_pairs: RwLock<Vec<ParaphrasePair>>,
    failing_similarities: RwLock<HashSet<String>>,
    encode_calls: AtomicUsize,
    similarity_calls: AtomicUsize,
}

impl MockEmbeddingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the encoding returned for `text`.
    pub fn set_encoding(&self, text: &str, encoding: Vec<f32>) {
        self.encodings.write().insert(text.to_string(), encoding);
    }

    /// Scripts the similarity score returned when `b` is compared against
    /// any corpus text.
    pub fn set_similarity(&self, b: &str, score: f32) {
        self.similarities.write().insert(b.to_string(), score);
    }

    /// Makes similarity requests for `b` fail.
    pub fn fail_similarity(&self, b: &str) {
        self.failing_similarities.write().insert(b.to_string());
    }

    /// Scripts the pair list returned by `paraphrase_scores`.
    pub fn set_paraphrase_pairs(&self, pairs: Vec<ParaphrasePair>) {
        *self.paraphrase_pairs.write() = pairs;
    }

    /// Number of `encode` calls so far.
    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    /// Number of `similarity` calls so far.
    pub fn similarity_calls(&self) -> usize {
        self.similarity_calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingClient for MockEmbeddingClient {
    async fn encode(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .encodings
            .read()
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0, 0.0, 0.0]))
    }

    async fn similarity(&self, _a: &str, b: &str) -> EmbeddingResult<f32> {
        self.similarity_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_similarities.read().contains(b) {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("injected similarity failure for {:?}", b),
            });
        }
        Ok(self.similarities.read().get(b).copied().unwrap_or(0.0))
    }

    async fn paraphrase_scores(
        &self,
        _sentences: &[String],
    ) -> EmbeddingResult<Vec<ParaphrasePair>> {
        Ok(self.paraphrase_pairs.read().clone())
    }
}
