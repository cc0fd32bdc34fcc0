//! Serde-loaded linear classifier.
//!
//! The offline trainer fits a one-vs-rest linear model over question
//! embeddings and writes it out as JSON: one weight row and intercept per
//! class, with answer ids as labels. Binary models follow the usual
//! convention of a single row whose signed score separates the two labels.

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};

/// Per-class decision scores from a classifier.
///
/// Not probabilities. Binary models emit a single signed scalar; multiclass
/// models emit one score per class.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionScores {
    /// Single signed score from a binary model.
    Scalar(f32),
    /// One score per class, in label order.
    PerClass(Vec<f32>),
}

impl DecisionScores {
    /// Highest score, used as the prediction confidence.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            DecisionScores::Scalar(score) => Some(*score),
            DecisionScores::PerClass(scores) => {
                scores.iter().copied().reduce(f32::max)
            }
        }
    }
}

/// Contract of a trained classifier artifact.
pub trait Classifier: Send + Sync {
    /// Predicted label (an answer id) for the embedding.
    fn predict(&self, embedding: &[f32]) -> ModelResult<String>;

    /// Per-class decision scores for the embedding.
    fn decision_scores(&self, embedding: &[f32]) -> ModelResult<DecisionScores>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinearModelData {
    labels: Vec<String>,
    weights: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

/// Linear one-vs-rest classifier loaded from a JSON artifact.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    data: LinearModelData,
    dim: usize,
}

impl LinearClassifier {
    /// Builds a classifier from label/weight/intercept tables.
    pub fn new(
        labels: Vec<String>,
        weights: Vec<Vec<f32>>,
        intercepts: Vec<f32>,
    ) -> ModelResult<Self> {
        Self::from_data(LinearModelData {
            labels,
            weights,
            intercepts,
        })
    }

    /// Parses a JSON artifact.
    pub fn from_json(bytes: &[u8]) -> ModelResult<Self> {
        let data: LinearModelData =
            serde_json::from_slice(bytes).map_err(|e| ModelError::Malformed {
                reason: e.to_string(),
            })?;
        Self::from_data(data)
    }

    fn from_data(data: LinearModelData) -> ModelResult<Self> {
        if data.labels.is_empty() {
            return Err(ModelError::Malformed {
                reason: "model has no labels".to_string(),
            });
        }
        let expected_rows = if data.labels.len() == 2 {
            1
        } else {
            data.labels.len()
        };
        if data.weights.len() != expected_rows {
            return Err(ModelError::Malformed {
                reason: format!(
                    "{} labels require {} weight rows, found {}",
                    data.labels.len(),
                    expected_rows,
                    data.weights.len()
                ),
            });
        }
        if data.intercepts.len() != data.weights.len() {
            return Err(ModelError::Malformed {
                reason: format!(
                    "{} weight rows but {} intercepts",
                    data.weights.len(),
                    data.intercepts.len()
                ),
            });
        }
        let dim = data.weights[0].len();
        if dim == 0 || data.weights.iter().any(|row| row.len() != dim) {
            return Err(ModelError::Malformed {
                reason: "weight rows have inconsistent dimensions".to_string(),
            });
        }
        Ok(Self { data, dim })
    }

    /// Labels in class order.
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// Embedding dimension the model was trained with.
    pub fn dim(&self) -> usize {
        self.dim
    }

    fn check_dim(&self, embedding: &[f32]) -> ModelResult<()> {
        if embedding.len() != self.dim {
            return Err(ModelError::DimensionMismatch {
                expected: self.dim,
                got: embedding.len(),
            });
        }
        Ok(())
    }

    fn raw_scores(&self, embedding: &[f32]) -> Vec<f32> {
        self.data
            .weights
            .iter()
            .zip(&self.data.intercepts)
            .map(|(row, intercept)| {
                row.iter()
                    .zip(embedding)
                    .map(|(w, x)| w * x)
                    .sum::<f32>()
                    + intercept
            })
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, embedding: &[f32]) -> ModelResult<String> {
        self.check_dim(embedding)?;
        let scores = self.raw_scores(embedding);

        if self.data.labels.len() == 2 {
            let label_index = usize::from(scores[0] > 0.0);
            return Ok(self.data.labels[label_index].clone());
        }

        let best = scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .ok_or_else(|| ModelError::Malformed {
                reason: "model produced no scores".to_string(),
            })?;
        Ok(self.data.labels[best].clone())
    }

    fn decision_scores(&self, embedding: &[f32]) -> ModelResult<DecisionScores> {
        self.check_dim(embedding)?;
        let scores = self.raw_scores(embedding);

        if self.data.labels.len() == 2 {
            Ok(DecisionScores::Scalar(scores[0]))
        } else {
            Ok(DecisionScores::PerClass(scores))
        }
    }
}
