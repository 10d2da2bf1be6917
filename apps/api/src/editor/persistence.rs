//! Persistence side channel for editor sessions.
//!
//! The snapshot is a cache of the in-memory session: it is written after every
//! change and read back when a session is requested that is not in memory.
//! The on-disk envelope is `{"state": {...}, "version": 1}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::editor::history::{History, MAX_HISTORY_SIZE};
use crate::editor::session::EditorSession;
use crate::models::cv::CvDocument;

pub const STORAGE_KEY: &str = "altocv-editor-state";
pub const STORAGE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String key-value slot backing the snapshot.
pub trait StateStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage, used in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still consistent: every write is a single insert.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.slots().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.slots().remove(key);
        Ok(())
    }
}

/// Serialized form of an `EditorSession`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub cv: Option<CvDocument>,
    pub cv_id: Option<String>,
    pub history: Vec<CvDocument>,
    pub history_index: i64,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub is_saving: bool,
    #[serde(default)]
    pub last_saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub state: SessionSnapshot,
    pub version: u32,
}

impl SessionSnapshot {
    pub fn capture(session: &EditorSession) -> Self {
        Self {
            cv: session.cv().cloned(),
            cv_id: session.cv_id.clone(),
            history: session.history.entries().to_vec(),
            history_index: session.history.index(),
            is_loading: session.is_loading,
            is_saving: session.is_saving,
            last_saved_at: session.last_saved_at,
        }
    }

    /// Rebuilds a session. Returns `None` when the cursor does not point into
    /// the history or disagrees with the stored `cv`.
    pub fn restore(self) -> Option<EditorSession> {
        let cursor = match self.history_index {
            -1 => None,
            i => Some(usize::try_from(i).ok()?),
        };
        let history = History::from_parts(self.history, cursor, MAX_HISTORY_SIZE)?;
        if history.current() != self.cv.as_ref() {
            return None;
        }
        Some(EditorSession {
            cv_id: self.cv_id,
            history,
            is_loading: self.is_loading,
            // a save in flight did not survive the restart
            is_saving: false,
            last_saved_at: self.last_saved_at,
        })
    }
}

/// Serializes a session into its versioned envelope.
pub fn encode(session: &EditorSession) -> Result<String, PersistError> {
    let envelope = PersistedState {
        state: SessionSnapshot::capture(session),
        version: STORAGE_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Writes an envelope produced by [`encode`].
pub fn write_encoded(storage: &dyn StateStorage, key: &str, raw: &str) -> Result<(), PersistError> {
    storage.save(key, raw)?;
    debug!("Persisted editor state under '{key}' ({} bytes)", raw.len());
    Ok(())
}

/// Loads a persisted session. A missing slot, a version mismatch or a
/// structurally invalid snapshot all yield `Ok(None)`.
pub fn rehydrate(
    storage: &dyn StateStorage,
    key: &str,
) -> Result<Option<EditorSession>, PersistError> {
    let Some(raw) = storage.load(key)? else {
        return Ok(None);
    };
    let envelope: PersistedState = serde_json::from_str(&raw)?;
    if envelope.version != STORAGE_VERSION {
        warn!(
            "Discarding editor state '{key}': version {} (expected {STORAGE_VERSION})",
            envelope.version
        );
        return Ok(None);
    }
    match envelope.state.restore() {
        Some(session) => Ok(Some(session)),
        None => {
            warn!("Discarding editor state '{key}': history cursor out of range");
            Ok(None)
        }
    }
}

pub fn clear_persisted(storage: &dyn StateStorage, key: &str) -> Result<(), PersistError> {
    storage.remove(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{basic_cv, experience};
    use serde_json::json;

    fn persist(
        session: &EditorSession,
        storage: &dyn StateStorage,
        key: &str,
    ) -> Result<(), PersistError> {
        write_encoded(storage, key, &encode(session)?)
    }

    fn edited_session() -> EditorSession {
        let mut session = EditorSession::new();
        session.load_cv("cv-123", basic_cv());
        session.add_experience(experience("exp-1", &["Led a team of 5"]));
        session.update_summary("Backend engineer");
        session.undo();
        session.set_last_saved_at(Utc::now());
        session
    }

    #[test]
    fn test_envelope_shape() {
        let storage = MemoryStorage::new();
        persist(&edited_session(), &storage, STORAGE_KEY).unwrap();
        let raw = storage.load(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["state"]["cvId"], "cv-123");
        assert_eq!(value["state"]["historyIndex"], 1);
        assert_eq!(value["state"]["history"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_rehydrate_restores_cursor_and_redo() {
        let storage = MemoryStorage::new();
        let session = edited_session();
        persist(&session, &storage, STORAGE_KEY).unwrap();

        let mut restored = rehydrate(&storage, STORAGE_KEY).unwrap().unwrap();
        assert_eq!(restored.cv(), session.cv());
        assert_eq!(restored.history().index(), 1);
        assert_eq!(restored.last_saved_at(), session.last_saved_at());
        assert!(restored.redo());
        assert_eq!(
            restored.cv().unwrap().summary.as_deref(),
            Some("Backend engineer")
        );
    }

    #[test]
    fn test_rehydrate_clears_saving_flag() {
        let storage = MemoryStorage::new();
        let mut session = edited_session();
        session.set_saving(true);
        persist(&session, &storage, STORAGE_KEY).unwrap();

        let restored = rehydrate(&storage, STORAGE_KEY).unwrap().unwrap();
        assert!(!restored.is_saving());
    }

    #[test]
    fn test_rehydrate_missing_slot() {
        let storage = MemoryStorage::new();
        assert!(rehydrate(&storage, STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_wrong_version_is_discarded() {
        let storage = MemoryStorage::new();
        let raw = json!({
            "state": SessionSnapshot::capture(&edited_session()),
            "version": 2
        });
        storage.save(STORAGE_KEY, &raw.to_string()).unwrap();
        assert!(rehydrate(&storage, STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_cursor_is_discarded() {
        let storage = MemoryStorage::new();
        let mut snapshot = SessionSnapshot::capture(&edited_session());
        snapshot.history_index = 7;
        let raw = serde_json::to_string(&PersistedState {
            state: snapshot,
            version: STORAGE_VERSION,
        })
        .unwrap();
        storage.save(STORAGE_KEY, &raw).unwrap();
        assert!(rehydrate(&storage, STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_empty_session_roundtrip() {
        let storage = MemoryStorage::new();
        persist(&EditorSession::new(), &storage, STORAGE_KEY).unwrap();
        let restored = rehydrate(&storage, STORAGE_KEY).unwrap().unwrap();
        assert!(restored.cv().is_none());
        assert_eq!(restored.history().index(), -1);
    }

    #[test]
    fn test_garbage_is_a_serde_error() {
        let storage = MemoryStorage::new();
        storage.save(STORAGE_KEY, "not json").unwrap();
        assert!(matches!(
            rehydrate(&storage, STORAGE_KEY),
            Err(PersistError::Serde(_))
        ));
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state")).unwrap();
        let session = edited_session();

        persist(&session, &storage, "session-a").unwrap();
        assert!(storage.dir().join("session-a.json").exists());
        assert!(!storage.dir().join("session-a.json.tmp").exists());

        let restored = rehydrate(&storage, "session-a").unwrap().unwrap();
        assert_eq!(restored.cv(), session.cv());

        clear_persisted(&storage, "session-a").unwrap();
        assert!(storage.load("session-a").unwrap().is_none());
        // removing twice is fine
        clear_persisted(&storage, "session-a").unwrap();
    }
}
