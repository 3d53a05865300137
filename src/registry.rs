//! Connection registry: the single source of truth mapping live transport
//! sessions to user profiles.
//!
//! Sessions are keyed by the transport-assigned session id. Entries appear
//! when a `connect` call is processed and disappear only on an explicit
//! disconnect notification; nothing here expires entries on its own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A connected peer's profile.
///
/// Clients send only `username` and `browser`; the registry stamps
/// `session_id` when the entry is stored and `image` stays empty until the
/// first snapshot update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConnection {
    pub username: String,
    pub browser: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Session-id to profile map shared by all transport sessions.
///
/// Every operation takes the lock for a single map access; callers must never
/// run slow work (image transforms, socket writes) while one of these calls
/// is in flight on their behalf.
#[derive(Default)]
pub struct ConnectionRegistry {
    users: RwLock<HashMap<String, UserConnection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `session_id`.
    ///
    /// The stored profile always carries the key as its `session_id`,
    /// whatever the caller put in that field.
    pub async fn put(&self, session_id: &str, mut user: UserConnection) {
        user.session_id = session_id.to_owned();
        self.users.write().await.insert(session_id.to_owned(), user);
    }

    /// Remove and return the prior entry, if any.
    pub async fn remove(&self, session_id: &str) -> Option<UserConnection> {
        self.users.write().await.remove(session_id)
    }

    pub async fn get(&self, session_id: &str) -> Option<UserConnection> {
        self.users.read().await.get(session_id).cloned()
    }

    /// Snapshot of all connected profiles at call time. Later mutations do
    /// not affect an already-returned snapshot.
    pub async fn all(&self) -> Vec<UserConnection> {
        self.users.read().await.values().cloned().collect()
    }

    /// Linear scan for a session whose profile carries `username`. With
    /// duplicate usernames any matching session may be returned; callers get
    /// no ordering guarantee.
    pub async fn find_session_by_username(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .map(|user| user.session_id.clone())
    }
}
