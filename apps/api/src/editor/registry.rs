use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::editor::command::EditorCommand;
use crate::editor::persistence::{
    clear_persisted, encode, rehydrate, write_encoded, PersistError, StateStorage, STORAGE_KEY,
};
use crate::editor::session::EditorSession;
use crate::errors::AppError;
use crate::models::cv::CvDocument;

/// How often the idle sweeper wakes up.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Client-facing view of a session after an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub cv_id: Option<String>,
    pub cv: Option<CvDocument>,
    pub history_index: i64,
    pub history_length: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Whether the last operation changed the session.
    pub applied: bool,
}

impl SessionView {
    fn of(session_id: Uuid, session: &EditorSession, applied: bool) -> Self {
        Self {
            session_id,
            cv_id: session.cv_id().map(str::to_string),
            cv: session.cv().cloned(),
            history_index: session.history().index(),
            history_length: session.history().len(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            is_saving: session.is_saving(),
            last_saved_at: session.last_saved_at(),
            applied,
        }
    }
}

/// A resident session plus the bookkeeping the registry needs around it.
struct Slot {
    session: EditorSession,
    touched: Instant,
    /// The last mirror write failed, so storage is behind memory.
    dirty: bool,
    /// Set by `close`; holders of a stale `Arc` must not write it back.
    closed: bool,
}

type SharedSlot = Arc<Mutex<Slot>>;

/// Open editor sessions, keyed by id, each mirrored to its own storage slot.
///
/// The map lock is only held to look up, insert or remove a slot. Each
/// session has its own lock, held across its storage write so snapshots land
/// in order, and storage I/O runs on the blocking pool.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSlot>>,
    storage: Arc<dyn StateStorage>,
}

impl SessionRegistry {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            storage,
        }
    }

    pub async fn open(&self, cv_id: String, content: CvDocument) -> SessionView {
        let id = Uuid::new_v4();
        let mut session = EditorSession::new();
        session.load_cv(cv_id, content);

        let view = SessionView::of(id, &session, true);
        let slot = Arc::new(Mutex::new(Slot {
            session,
            touched: Instant::now(),
            dirty: false,
            closed: false,
        }));
        let mut guard = slot.lock().await;
        self.sessions.write().await.insert(id, slot.clone());
        self.mirror(id, &mut guard).await;
        info!("Opened editor session {id}");
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.with_session(id, |_| false).await
    }

    pub async fn apply(&self, id: Uuid, command: EditorCommand) -> Result<SessionView, AppError> {
        let name = command.name();
        let view = self.with_session(id, |session| command.apply(session)).await?;
        info!(
            "Session {id}: {name} (applied: {}, index {}/{})",
            view.applied, view.history_index, view.history_length
        );
        Ok(view)
    }

    pub async fn update_save_status(
        &self,
        id: Uuid,
        is_saving: bool,
        last_saved_at: Option<DateTime<Utc>>,
    ) -> Result<SessionView, AppError> {
        self.with_session(id, |session| {
            session.set_saving(is_saving);
            if let Some(at) = last_saved_at {
                session.set_last_saved_at(at);
            }
            true
        })
        .await
    }

    /// The session's current document, or `Conflict` when none is loaded.
    pub async fn current_cv(&self, id: Uuid) -> Result<CvDocument, AppError> {
        let view = self.view(id).await?;
        view.cv
            .ok_or_else(|| AppError::Conflict(format!("Session {id} has no CV loaded")))
    }

    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let resident = self.sessions.write().await.remove(&id);
        let in_memory = match &resident {
            Some(slot) => {
                // Wait out any in-flight write before clearing storage.
                slot.lock().await.closed = true;
                true
            }
            None => false,
        };

        let key = storage_key(id);
        let stored = self
            .blocking({
                let storage = self.storage.clone();
                move || {
                    let existed = storage.load(&key)?.is_some();
                    clear_persisted(storage.as_ref(), &key)?;
                    Ok(existed)
                }
            })
            .await?;

        if !in_memory && !stored {
            return Err(AppError::NotFound(format!("Editor session {id}")));
        }
        info!("Closed editor session {id}");
        Ok(())
    }

    /// Drops sessions untouched for at least `ttl`. Sessions that are busy or
    /// whose last write failed stay resident. Returns how many were evicted.
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(slot) => slot.dirty || slot.touched.elapsed() < ttl,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle editor session(s); {} resident", sessions.len());
        }
        evicted
    }

    /// Runs `sweep_idle` every minute for the life of the process.
    pub fn spawn_sweeper(self: &Arc<Self>, ttl: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                registry.sweep_idle(ttl).await;
            }
        })
    }

    /// Runs `op` against the session, rehydrating it first if needed, then
    /// mirrors the result to storage when `op` reports a change.
    async fn with_session(
        &self,
        id: Uuid,
        op: impl FnOnce(&mut EditorSession) -> bool,
    ) -> Result<SessionView, AppError> {
        let slot = self.slot(id).await?;
        let mut guard = slot.lock().await;
        if guard.closed {
            return Err(AppError::NotFound(format!("Editor session {id}")));
        }

        let applied = op(&mut guard.session);
        guard.touched = Instant::now();
        if applied {
            self.mirror(id, &mut guard).await;
        }
        Ok(SessionView::of(id, &guard.session, applied))
    }

    /// Looks up a resident session, or rehydrates it from storage.
    async fn slot(&self, id: Uuid) -> Result<SharedSlot, AppError> {
        if let Some(slot) = self.sessions.read().await.get(&id) {
            return Ok(slot.clone());
        }

        let key = storage_key(id);
        let restored = self
            .blocking({
                let storage = self.storage.clone();
                move || rehydrate(storage.as_ref(), &key)
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Editor session {id}")))?;

        let mut sessions = self.sessions.write().await;
        // Another request may have rehydrated it while storage was read.
        let slot = sessions.entry(id).or_insert_with(|| {
            info!("Rehydrated editor session {id}");
            Arc::new(Mutex::new(Slot {
                session: restored,
                touched: Instant::now(),
                dirty: false,
                closed: false,
            }))
        });
        Ok(slot.clone())
    }

    /// Writes the slot's session to storage. Failures are logged and leave the
    /// slot dirty; the edit itself stands.
    async fn mirror(&self, id: Uuid, slot: &mut Slot) {
        let raw = match encode(&slot.session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode editor state for session {id}: {e}");
                slot.dirty = true;
                return;
            }
        };
        let key = storage_key(id);
        let storage = self.storage.clone();
        match self
            .blocking(move || write_encoded(storage.as_ref(), &key, &raw))
            .await
        {
            Ok(()) => slot.dirty = false,
            Err(e) => {
                warn!("Failed to persist editor state for session {id}: {e}");
                slot.dirty = true;
            }
        }
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce() -> Result<T, PersistError> + Send + 'static,
        T: Send + 'static,
    {
        let result = tokio::task::spawn_blocking(work).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in editor storage: {e}"))
        })?;
        if let Err(e) = &result {
            debug!("Editor storage error: {e}");
        }
        Ok(result?)
    }
}

fn storage_key(id: Uuid) -> String {
    format!("{STORAGE_KEY}-{id}")
}
