use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::pattern::PatternRecord;

/// Errors emitted by snapshot backends.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence boundary consumed by the store.
///
/// Backends exchange plain [`PatternRecord`]s, never live patterns, so any
/// storage technology can adapt the snapshot.
pub trait SnapshotBackend<T> {
    /// Persists the full snapshot, replacing any previous one.
    fn save(&self, snapshot: &[PatternRecord<T>]) -> Result<(), SnapshotError>;
    /// Loads the most recent snapshot; an absent snapshot is an empty one.
    fn load(&self) -> Result<Vec<PatternRecord<T>>, SnapshotError>;
}

/// File-system backed snapshot store writing a single pretty-printed JSON
/// document under a base directory.
#[derive(Debug, Clone)]
pub struct JsonSnapshotBackend {
    base_path: PathBuf,
}

impl JsonSnapshotBackend {
    /// Creates a backend rooted at the provided base directory.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of the snapshot document.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.base_path.join("patterns.json")
    }

    /// Base directory this backend writes under.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl<T: Serialize + DeserializeOwned> SnapshotBackend<T> for JsonSnapshotBackend {
    fn save(&self, snapshot: &[PatternRecord<T>]) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.base_path)?;
        let data = serde_json::to_vec_pretty(snapshot)?;
        fs::write(self.snapshot_path(), data)?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<PatternRecord<T>>, SnapshotError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use indexmap::IndexSet;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let backend = JsonSnapshotBackend::new(dir.path());
        let pattern = Pattern::new(
            "alpha",
            "first insight".to_string(),
            IndexSet::from(["core".to_string()]),
            None,
        );
        let records = vec![PatternRecord::from(&pattern)];
        backend.save(&records).unwrap();
        let loaded: Vec<PatternRecord<String>> = backend.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "alpha");
        assert_eq!(loaded[0].access_count, 1);
    }

    #[test]
    fn missing_snapshot_loads_empty() {
        let dir = tempdir().unwrap();
        let backend = JsonSnapshotBackend::new(dir.path().join("never_written"));
        let loaded: Vec<PatternRecord<String>> = backend.load().unwrap();
        assert!(loaded.is_empty());
    }
}
