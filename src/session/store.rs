use super::{SessionId, SessionRecord};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Bounded session map guarded by a single lock.
///
/// The lock is only held for the map access itself. Records are shared as
/// `Arc`s and never mutated, so readers always see a complete record. When
/// the store is full the least recently used session is evicted.
pub struct SessionStore {
    sessions: Mutex<LruCache<SessionId, Arc<SessionRecord>>>,
}

impl SessionStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    // Records are immutable, so a panic while the lock was held cannot have
    // left a half-written entry behind.
    fn lock(&self) -> MutexGuard<'_, LruCache<SessionId, Arc<SessionRecord>>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a record under a freshly generated identifier.
    pub fn create(&self, record: impl Into<Arc<SessionRecord>>) -> SessionId {
        let id = Uuid::new_v4().to_string();
        let evicted = self.lock().push(id.clone(), record.into());

        if let Some((evicted_id, _)) = evicted {
            tracing::debug!(session_id = %evicted_id, "Session cache full, evicted oldest session");
        }
        id
    }

    /// Store a record that is removed again unless [`PendingSession::commit`]
    /// is called, including when the caller's future is dropped.
    pub fn create_pending(&self, record: impl Into<Arc<SessionRecord>>) -> PendingSession<'_> {
        PendingSession {
            store: self,
            id: Some(self.create(record)),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<SessionRecord>> {
        self.lock().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> Option<Arc<SessionRecord>> {
        self.lock().pop(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A session that stays in the store only once committed.
pub struct PendingSession<'a> {
    store: &'a SessionStore,
    id: Option<SessionId>,
}

impl PendingSession<'_> {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Keep the session and hand out its id.
    pub fn commit(mut self) -> SessionId {
        self.id.take().unwrap_or_default()
    }
}

impl Drop for PendingSession<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.store.remove(&id);
            tracing::warn!(session_id = %id, "Rolled back uncommitted session");
        }
    }
}
