use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::generator::dictionary::Dictionary;
use crate::generator::selector::WordSelector;
use crate::session::state::SessionEngine;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

struct SessionSlot {
    engine: SessionEngine,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

/// Independent sessions keyed by id. Every operation on a session runs under that
/// session's own lock; sessions share only the read-only word selector.
pub struct SessionRegistry {
    selector: Arc<WordSelector>,
    sessions: RwLock<BTreeMap<String, Arc<Mutex<SessionSlot>>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(WordSelector::new(&Dictionary::load())))
    }
}

impl SessionRegistry {
    pub fn new(selector: Arc<WordSelector>) -> Self {
        Self {
            selector,
            sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Open a session with its own engine and history handle, with its first
    /// round already started.
    pub fn create(&self, config: Config) -> String {
        let mut engine = SessionEngine::open_with_selector(config, Arc::clone(&self.selector));
        engine.start_round();
        self.insert(engine)
    }

    pub fn insert(&self, engine: SessionEngine) -> String {
        let id = generate_session_id();
        let now = Utc::now();
        let slot = SessionSlot {
            engine,
            created_at: now,
            last_used: now,
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::new(Mutex::new(slot)));
        debug!(session = %id, "session created");
        id
    }

    /// Run `f` against the session's engine while holding its lock.
    /// `None` when no such session exists.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut SessionEngine) -> R) -> Option<R> {
        let slot = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()?;
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.last_used = Utc::now();
        Some(f(&mut slot.engine))
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some();
        if removed {
            debug!(session = %id, "session removed");
        }
        removed
    }

    pub fn list(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .iter()
            .map(|(id, slot)| {
                let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                SessionInfo {
                    id: id.clone(),
                    created_at: slot.created_at,
                    last_used: slot.last_used,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 128 random bits as 32 lowercase hex digits.
fn generate_session_id() -> String {
    let bytes: [u8; 16] = rand::thread_rng().r#gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
