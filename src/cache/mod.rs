//! Bounded, freshness-checked cache of loaded mentor classifiers.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{CacheError, CacheResult};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use tracing::{debug, info};

use crate::knowledge::{AuthContext, KnowledgeIndex, KnowledgeStore};
use crate::model::{Classifier, ModelStore};

/// One mentor's knowledge index and trained classifier, loaded together.
///
/// The index is owned exclusively by the cache entry holding this value; a
/// stale entry is replaced wholesale rather than patched.
#[derive(Debug)]
pub struct LoadedMentor<C> {
    mentor_id: String,
    index: KnowledgeIndex,
    model: C,
}

impl<C: Classifier> LoadedMentor<C> {
    /// Mentor id this bundle was loaded for.
    pub fn mentor_id(&self) -> &str {
        &self.mentor_id
    }

    /// The mentor's knowledge index.
    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }

    /// The mentor's trained classifier.
    pub fn model(&self) -> &C {
        &self.model
    }
}

struct CacheSlot<C> {
    mentor: Arc<LoadedMentor<C>>,
    last_trained_at: DateTime<Utc>,
}

impl<C> Clone for CacheSlot<C> {
    fn clone(&self) -> Self {
        Self {
            mentor: Arc::clone(&self.mentor),
            last_trained_at: self.last_trained_at,
        }
    }
}

/// Bounded cache of [`LoadedMentor`]s keyed by mentor id.
///
/// Each `get` verifies the cached entry against the artifact's current
/// training timestamp (a metadata-only check) and reloads when the artifact
/// changed. Concurrent gets for the same mentor may race into duplicate
/// loads; the last insert wins and earlier clones stay valid for their
/// holders.
pub struct ClassifierCache<M: ModelStore, K: KnowledgeStore> {
    store: Arc<M>,
    knowledge: Arc<K>,
    entries: Cache<String, CacheSlot<M::Model>>,
}

impl<M: ModelStore, K: KnowledgeStore> ClassifierCache<M, K> {
    /// Default max number of cached mentors.
    pub const DEFAULT_CAPACITY: u64 = 1000;

    /// Creates a cache with the default capacity.
    pub fn new(store: Arc<M>, knowledge: Arc<K>) -> Self {
        Self::with_capacity(store, knowledge, Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` mentors.
    pub fn with_capacity(store: Arc<M>, knowledge: Arc<K>, capacity: u64) -> Self {
        Self {
            store,
            knowledge,
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the mentor's classifier bundle, reloading if the backing
    /// artifact changed since it was cached.
    pub async fn get(
        &self,
        mentor_id: &str,
        auth: &AuthContext,
    ) -> CacheResult<Arc<LoadedMentor<M::Model>>> {
        let current = self.store.last_trained_at(mentor_id).await?;

        if let Some(slot) = self.entries.get(mentor_id) {
            if slot.last_trained_at >= current {
                debug!(mentor_id, "classifier cache hit");
                return Ok(slot.mentor);
            }
            debug!(
                mentor_id,
                cached = %slot.last_trained_at,
                artifact = %current,
                "classifier cache stale, reloading"
            );
        }

        let model = self.store.load(mentor_id).await?;
        let graph = self.knowledge.fetch_mentor_graph(mentor_id, auth).await?;
        let index = KnowledgeIndex::from_graph(&graph);

        let mentor = Arc::new(LoadedMentor {
            mentor_id: mentor_id.to_string(),
            index,
            model,
        });
        self.entries.insert(
            mentor_id.to_string(),
            CacheSlot {
                mentor: Arc::clone(&mentor),
                last_trained_at: current,
            },
        );

        info!(mentor_id, trained_at = %current, "classifier loaded");
        Ok(mentor)
    }

    /// Drops one mentor from the cache.
    pub fn invalidate(&self, mentor_id: &str) {
        self.entries.invalidate(mentor_id);
    }

    /// Number of cached mentors.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Returns `true` if no mentors are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl<M: ModelStore, K: KnowledgeStore> std::fmt::Debug for ClassifierCache<M, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
