//! Registry of live sessions
//!
//! Sessions are indexed by the ID the UI shell assigned them, and looked up
//! for reuse by [`SessionKey`] (server display name + forwarding flag).
//!
//! # Atomicity Model
//!
//! Independent commands may target the same key at the same time. Every
//! read-modify-write sequence (get-or-create, remove) holds `write_lock`
//! for its whole duration, including the await on session creation, so two
//! callers can never both observe "absent" and both create. Plain reads
//! (`find`, `list`, `filter`) go straight to the map.

use dashmap::DashMap;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use sp_core::time::current_time_millis;
use sp_core::traits::TerminalSession;
use sp_core::{SessionId, SessionKey};

/// Handle to a live session
pub struct SessionHandle {
    pub id: SessionId,
    pub display_name: String,
    pub username: String,
    pub host: String,
    pub is_forwarding: bool,
    /// Creation time in Unix milliseconds
    pub created_at: u64,
    session: Arc<dyn TerminalSession>,
}

impl SessionHandle {
    pub fn new(
        display_name: impl Into<String>,
        username: impl Into<String>,
        host: impl Into<String>,
        is_forwarding: bool,
        session: Arc<dyn TerminalSession>,
    ) -> Self {
        Self {
            id: session.id(),
            display_name: display_name.into(),
            username: username.into(),
            host: host.into(),
            is_forwarding,
            created_at: current_time_millis(),
            session,
        }
    }

    /// Reuse key of this session
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.display_name.clone(), self.is_forwarding)
    }

    /// The UI shell's session object
    pub fn session(&self) -> &Arc<dyn TerminalSession> {
        &self.session
    }

    pub fn descriptor(&self) -> SessionDescriptor {
        SessionDescriptor {
            id: self.id,
            name: self.display_name.clone(),
            username: self.username.clone(),
            host: self.host.clone(),
            is_forwarding: self.is_forwarding,
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("host", &self.host)
            .field("is_forwarding", &self.is_forwarding)
            .finish()
    }
}

/// Public view of a live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub id: SessionId,
    pub name: String,
    pub username: String,
    pub host: String,
    pub is_forwarding: bool,
    pub created_at: u64,
}

/// Result of [`SessionRegistry::get_or_create`]
#[derive(Debug, Clone)]
pub enum Acquired {
    Reused(Arc<SessionHandle>),
    Created(Arc<SessionHandle>),
}

impl Acquired {
    pub fn handle(&self) -> &Arc<SessionHandle> {
        match self {
            Acquired::Reused(h) | Acquired::Created(h) => h,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Acquired::Created(_))
    }
}

/// Tracks every live session handle
pub struct SessionRegistry {
    write_lock: Mutex<()>,
    sessions: DashMap<SessionId, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            write_lock: Mutex::new(()),
            sessions: DashMap::new(),
        }
    }

    /// Return the session registered under `key`, or create and register one.
    ///
    /// With `reuse == false` a new session is always created. `create` runs
    /// with the registry locked and is not called when a session is reused.
    pub async fn get_or_create<F, Fut, E>(
        &self,
        key: &SessionKey,
        reuse: bool,
        create: F,
    ) -> Result<Acquired, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SessionHandle, E>>,
    {
        let _lock = self.write_lock.lock().await;

        if reuse {
            if let Some(existing) = self.find(key) {
                tracing::debug!("Reusing {} for '{}'", existing.id, key);
                return Ok(Acquired::Reused(existing));
            }
        }

        let handle = Arc::new(create().await?);
        self.sessions.insert(handle.id, Arc::clone(&handle));
        tracing::debug!("Registered {} for '{}'", handle.id, key);
        Ok(Acquired::Created(handle))
    }

    /// Forget a closed session
    pub async fn remove(&self, id: SessionId) -> Option<Arc<SessionHandle>> {
        let _lock = self.write_lock.lock().await;
        self.sessions.remove(&id).map(|(_, handle)| handle)
    }

    /// Oldest live session for `key`
    pub fn find(&self, key: &SessionKey) -> Option<Arc<SessionHandle>> {
        self.sessions
            .iter()
            .filter(|r| r.is_forwarding == key.forwarding && r.display_name == key.server)
            .min_by_key(|r| r.id)
            .map(|r| Arc::clone(&r))
    }

    /// Get a session by ID
    pub fn get(&self, id: SessionId) -> Option<Arc<SessionHandle>> {
        self.sessions.get(&id).map(|r| Arc::clone(&r))
    }

    /// All sessions, oldest first
    pub fn list(&self) -> Vec<Arc<SessionHandle>> {
        let mut all: Vec<_> = self.sessions.iter().map(|r| Arc::clone(&r)).collect();
        all.sort_by_key(|h| h.id);
        all
    }

    /// Sessions matching `host` and `username` exactly; an empty filter matches everything
    pub fn filter(&self, host: &str, username: &str) -> Vec<SessionDescriptor> {
        self.list()
            .iter()
            .filter(|h| host.is_empty() || h.host == host)
            .filter(|h| username.is_empty() || h.username == username)
            .map(|h| h.descriptor())
            .collect()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
