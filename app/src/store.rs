//! JSON file snapshot store
//!
//! Keeps the persisted snapshot in one JSON file. Saves write a sibling
//! temp file and rename it over the target, so a crash mid-write leaves
//! the previous snapshot intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bw_diet_shared::{PersistedSnapshot, SnapshotStore};
use tracing::debug;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    type Error = AppError;

    fn load(&self) -> AppResult<Option<PersistedSnapshot>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot file yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot = PersistedSnapshot::from_json(&json)?;
        debug!(
            path = %self.path.display(),
            version = snapshot.version,
            entries = snapshot.state.weight_history.len(),
            "Loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &PersistedSnapshot) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = snapshot.to_json(self.pretty)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "Saved snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw_diet_shared::{load_state, ProfileState, ProfileUpdate};

    #[test]
    fn test_missing_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"), true);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/user.json"), false);

        let mut state = ProfileState::new();
        state.set_profile(&ProfileUpdate {
            name: Some("Hana".to_string()),
            ..Default::default()
        });
        store.save(&PersistedSnapshot::capture(&state)).unwrap();

        assert!(!store.temp_path().exists());
        assert_eq!(load_state(&store).unwrap(), state);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        fs::write(&path, "{ broken").unwrap();
        let store = JsonFileStore::new(path, true);
        assert!(matches!(store.load(), Err(AppError::Core(_))));
    }
}
