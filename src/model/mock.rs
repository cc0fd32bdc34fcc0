//! In-memory [`ModelStore`] for tests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::error::{ModelError, ModelResult};
use super::linear::LinearClassifier;
use super::store::ModelStore;

/// Mock model store with per-mentor scripted classifiers, adjustable
/// training timestamps and a load counter for cache-freshness probes.
#[derive(Default)]
pub struct MockModelStore {
    models: RwLock<HashMap<String, (LinearClassifier, DateTime<Utc>)>>,
    load_counts: RwLock<HashMap<String, usize>>,
}

impl MockModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a classifier for `mentor_id`, trained at `trained_at`.
    pub fn set_model(&self, mentor_id: &str, model: LinearClassifier, trained_at: DateTime<Utc>) {
        self.models
            .write()
            .insert(mentor_id.to_string(), (model, trained_at));
    }

    /// Bumps the training timestamp without changing the model, as a
    /// retrain of the same artifact would.
    pub fn touch(&self, mentor_id: &str, trained_at: DateTime<Utc>) {
        if let Some(entry) = self.models.write().get_mut(mentor_id) {
            entry.1 = trained_at;
        }
    }

    /// Number of `load` calls for `mentor_id` so far.
    pub fn load_count(&self, mentor_id: &str) -> usize {
        self.load_counts
            .read()
            .get(mentor_id)
            .copied()
            .unwrap_or(0)
    }
}

impl ModelStore for MockModelStore {
    type Model = LinearClassifier;

    async fn last_trained_at(&self, mentor_id: &str) -> ModelResult<DateTime<Utc>> {
        self.models
            .read()
            .get(mentor_id)
            .map(|(_, trained_at)| *trained_at)
            .ok_or_else(|| ModelError::NotFound {
                mentor_id: mentor_id.to_string(),
            })
    }

    async fn load(&self, mentor_id: &str) -> ModelResult<Self::Model> {
        *self
            .load_counts
            .write()
            .entry(mentor_id.to_string())
            .or_insert(0) += 1;

        self.models
            .read()
            .get(mentor_id)
            .map(|(model, _)| model.clone())
            .ok_or_else(|| ModelError::NotFound {
                mentor_id: mentor_id.to_string(),
            })
    }
}
