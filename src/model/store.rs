//! Model artifact storage.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::{ModelError, ModelResult};
use super::linear::{Classifier, LinearClassifier};

/// Architecture directory name under each mentor's model directory.
pub const MODEL_ARCH: &str = "lr_embedding";

/// Artifact file name.
pub const MODEL_FILE: &str = "model.json";

/// Capability contract over trained model artifacts.
///
/// `last_trained_at` must be a metadata-only check — the classifier cache
/// calls it on every request and may only pay for a full `load` when the
/// artifact actually changed.
pub trait ModelStore: Send + Sync {
    /// The classifier type this store produces.
    type Model: Classifier + Clone + Send + Sync + 'static;

    /// Timestamp of the mentor's artifact, without loading it.
    fn last_trained_at(
        &self,
        mentor_id: &str,
    ) -> impl std::future::Future<Output = ModelResult<DateTime<Utc>>> + Send;

    /// Loads the mentor's classifier.
    fn load(
        &self,
        mentor_id: &str,
    ) -> impl std::future::Future<Output = ModelResult<Self::Model>> + Send;
}

/// Filesystem-backed [`ModelStore`].
///
/// Artifacts live at `<models>/<mentor>/<arch>/model.json`; the file's
/// mtime is the training timestamp. Synchronizing that directory with
/// durable blob storage is the caller's concern.
#[derive(Debug, Clone)]
pub struct FsModelStore {
    models_path: PathBuf,
}

impl FsModelStore {
    /// Creates a store rooted at `models_path`.
    pub fn new(models_path: PathBuf) -> Self {
        Self { models_path }
    }

    /// Root directory of the store.
    pub fn models_path(&self) -> &std::path::Path {
        &self.models_path
    }

    /// Path of one mentor's artifact file.
    pub fn model_file(&self, mentor_id: &str) -> PathBuf {
        self.models_path.join(mentor_id).join(MODEL_ARCH).join(MODEL_FILE)
    }
}

fn not_found(mentor_id: &str, e: std::io::Error) -> ModelError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ModelError::NotFound {
            mentor_id: mentor_id.to_string(),
        }
    } else {
        ModelError::Io(e)
    }
}

impl ModelStore for FsModelStore {
    type Model = LinearClassifier;

    async fn last_trained_at(&self, mentor_id: &str) -> ModelResult<DateTime<Utc>> {
        let path = self.model_file(mentor_id);
        let mentor_id = mentor_id.to_string();

        tokio::task::spawn_blocking(move || {
            let metadata = std::fs::metadata(&path).map_err(|e| not_found(&mentor_id, e))?;
            let modified = metadata.modified().map_err(ModelError::Io)?;
            Ok(DateTime::<Utc>::from(modified))
        })
        .await
        .map_err(|e| ModelError::Io(std::io::Error::other(e)))?
    }

    async fn load(&self, mentor_id: &str) -> ModelResult<Self::Model> {
        let path = self.model_file(mentor_id);
        let mentor_id = mentor_id.to_string();

        debug!(mentor_id = %mentor_id, path = %path.display(), "loading model artifact");

        tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path).map_err(|e| not_found(&mentor_id, e))?;
            LinearClassifier::from_json(&bytes)
        })
        .await
        .map_err(|e| ModelError::Io(std::io::Error::other(e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_artifact(dir: &std::path::Path, mentor_id: &str) -> PathBuf {
        let model_dir = dir.join(mentor_id).join(MODEL_ARCH);
        std::fs::create_dir_all(&model_dir).unwrap();
        let file = model_dir.join(MODEL_FILE);
        let artifact = serde_json::json!({
            "labels": ["A1", "A2", "A3"],
            "weights": [[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]],
            "intercepts": [0.0, 0.0, 0.0],
        });
        std::fs::write(&file, artifact.to_string()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_reads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "clint");

        let store = FsModelStore::new(dir.path().to_path_buf());
        let model = store.load("clint").await.unwrap();
        assert_eq!(model.labels(), ["A1", "A2", "A3"]);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::new(dir.path().to_path_buf());

        assert!(matches!(
            store.load("nobody").await.unwrap_err(),
            ModelError::NotFound { .. }
        ));
        assert!(matches!(
            store.last_trained_at("nobody").await.unwrap_err(),
            ModelError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_last_trained_at_tracks_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_artifact(dir.path(), "clint");

        let store = FsModelStore::new(dir.path().to_path_buf());
        let first = store.last_trained_at("clint").await.unwrap();

        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
        let file_handle = std::fs::File::options().append(true).open(&file).unwrap();
        file_handle.set_modified(later).unwrap();

        let second = store.last_trained_at("clint").await.unwrap();
        assert!(second > first);
    }
}
