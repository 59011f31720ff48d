use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::domain::store::ArtifactStore;
use crate::error::SessionError;
use crate::models::SolveResult;

/// Per-session state handed to command handlers: the artifact store (absent
/// until the first store command) and the published solve results.
#[derive(Debug, Default)]
pub struct Session {
    store: Option<ArtifactStore>,
    results: HashMap<String, SolveResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> Result<&ArtifactStore, SessionError> {
        self.store.as_ref().ok_or(SessionError::StoreMissing)
    }

    pub fn store_mut(&mut self) -> Result<&mut ArtifactStore, SessionError> {
        self.store.as_mut().ok_or(SessionError::StoreMissing)
    }

    pub fn store_or_init(&mut self) -> &mut ArtifactStore {
        self.store.get_or_insert_with(ArtifactStore::new)
    }

    pub fn publish(&mut self, name: impl Into<String>, result: SolveResult) {
        self.results.insert(name.into(), result);
    }

    pub fn result(&self, name: &str) -> Option<&SolveResult> {
        self.results.get(name)
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

/// Sessions by id. The least recently used session is evicted once
/// `capacity` is exceeded.
pub struct SessionRegistry {
    sessions: Mutex<LruCache<String, SharedSession>>,
}

impl SessionRegistry {
    pub fn new(capacity: NonZeroUsize) -> Self {
        SessionRegistry {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_create(&self, id: &str) -> SharedSession {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get(id) {
            return Arc::clone(session);
        }
        log::info!("Creating session '{}'", id);
        let session: SharedSession = Arc::new(Mutex::new(Session::new()));
        if let Some((evicted, _)) = sessions.push(id.to_string(), Arc::clone(&session)) {
            if evicted != id {
                log::info!("Evicted least recently used session '{}'", evicted);
            }
        }
        session
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.lock().get(id).map(Arc::clone)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.lock().pop(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
