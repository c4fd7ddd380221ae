//! Presence Registry
//!
//! In-memory map from a connected user to their live session.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{Connection, Session};
use crate::infrastructure::metrics;

/// Registry of connected users.
///
/// At most one session per user. Lookups share a read lock; register and
/// unregister take the write lock. No lock is held while a frame is pushed:
/// callers get an `Arc<Session>` and write through it after the lookup returns.
#[derive(Default)]
pub struct PresenceRegistry {
    sessions: RwLock<HashMap<i64, Arc<Session>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the session for `user_id`.
    ///
    /// A replaced session is returned but not closed or notified; its socket
    /// lives on until it fails by itself.
    pub fn register(
        &self,
        user_id: i64,
        login: impl Into<String>,
        connection: Connection,
    ) -> Option<Arc<Session>> {
        let session = Arc::new(Session::new(user_id, login, connection));
        let connection_id = session.connection_id();

        let (previous, count) = {
            let mut sessions = self.sessions.write();
            let previous = sessions.insert(user_id, session);
            (previous, sessions.len())
        };
        metrics::set_presence_sessions(count);

        match &previous {
            Some(old) => tracing::info!(
                user_id = user_id,
                connection_id = %connection_id,
                replaced_connection_id = %old.connection_id(),
                "Session replaced"
            ),
            None => tracing::info!(
                user_id = user_id,
                connection_id = %connection_id,
                "Session registered"
            ),
        }

        previous
    }

    pub fn lookup(&self, user_id: i64) -> Option<Arc<Session>> {
        self.sessions.read().get(&user_id).cloned()
    }

    /// Remove the session for `user_id` if it still uses `connection_id`.
    ///
    /// A newer session registered by a reconnect is left in place.
    pub fn unregister(&self, user_id: i64, connection_id: Uuid) -> bool {
        let (removed, count) = {
            let mut sessions = self.sessions.write();
            let owned = sessions
                .get(&user_id)
                .is_some_and(|s| s.connection_id() == connection_id);
            if owned {
                sessions.remove(&user_id);
            }
            (owned, sessions.len())
        };

        if removed {
            metrics::set_presence_sessions(count);
            tracing::info!(
                user_id = user_id,
                connection_id = %connection_id,
                "Session unregistered"
            );
        }
        removed
    }

    pub fn is_online(&self, user_id: i64) -> bool {
        self.sessions.read().contains_key(&user_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn online_users(&self) -> Vec<i64> {
        let mut users: Vec<i64> = self.sessions.read().keys().copied().collect();
        users.sort_unstable();
        users
    }
}
