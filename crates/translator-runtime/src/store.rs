//! Checkpoint store for the most recent kickoff.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use translator_core::KickoffLog;

use crate::error::RuntimeError;

/// File name of the checkpoint inside the state directory.
pub const KICKOFF_FILE: &str = "latest_kickoff.json";

/// Persists the latest [`KickoffLog`] as JSON under a state directory.
#[derive(Debug, Clone)]
pub struct KickoffStore {
    path: PathBuf,
}

impl KickoffStore {
    /// Create a store rooted at `state_dir`. Nothing is touched until the
    /// first save.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(KICKOFF_FILE),
        }
    }

    /// Path of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the checkpoint with `log`.
    pub fn save(&self, log: &KickoffLog) -> Result<(), RuntimeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| RuntimeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_string_pretty(log).map_err(|source| RuntimeError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(|source| RuntimeError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), records = log.records.len(), "Kickoff checkpoint saved");
        Ok(())
    }

    /// Load the last checkpoint.
    pub fn load(&self) -> Result<KickoffLog, RuntimeError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RuntimeError::NoRecordedKickoff(self.path.clone()))
            }
            Err(source) => {
                return Err(RuntimeError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&data).map_err(|source| RuntimeError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translator_core::{RunInputs, TaskRecord};

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = KickoffStore::new(&dir.path().join("state"));

        let mut log = KickoffLog::new(RunInputs::new("Hello", "English", "French", 2026));
        let mut record = TaskRecord::new("translation", "linguist");
        record.complete("Bonjour");
        log.records.push(record);
        store.save(&log).unwrap();

        assert!(dir.path().join("state").join(KICKOFF_FILE).exists());
        assert_eq!(store.load().unwrap(), log);
    }

    #[test]
    fn test_load_without_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let store = KickoffStore::new(dir.path());
        assert!(matches!(store.load(), Err(RuntimeError::NoRecordedKickoff(_))));
    }

    #[test]
    fn test_load_corrupt_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let store = KickoffStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(RuntimeError::Json { .. })));
    }
}
