use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use game_core::MatchEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-connection game state. Tool handlers take the write lock for the whole
/// mutation so each guess is an atomic read-modify-write.
pub struct PlayerSession {
    pub engine: RwLock<MatchEngine>,
}

impl PlayerSession {
    fn new() -> Self {
        Self {
            engine: RwLock::new(MatchEngine::new()),
        }
    }
}

pub struct SessionManager {
    sessions: RwLock<HashMap<ConnectionId, Arc<PlayerSession>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_session(&self, id: ConnectionId) -> Arc<PlayerSession> {
        let session = Arc::new(PlayerSession::new());
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, session.clone());
        session
    }

    pub async fn get_session(&self, id: ConnectionId) -> Option<Arc<PlayerSession>> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).cloned()
    }

    /// Drop the connection's session and reset its match. The reset is
    /// idempotent, so a second call for the same id is harmless.
    pub async fn remove_session(&self, id: ConnectionId) {
        let session = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&id)
        };

        if let Some(session) = session {
            session.engine.write().await.reset_match();
        }
    }

    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
