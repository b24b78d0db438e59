use crate::storage::Storage;
use clashhub_api::User;
use log::warn;
use serde::{Deserialize, Serialize};

const SESSION_FILE: &str = "session.json";

/// What survives a restart. The user record is refetched, not persisted.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// The current login, owned by whoever owns the app state. Nothing here is
/// global; hand a `&Session` to anything that needs to know who is signed in.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// Rehydrate from durable storage. The user stays unknown until the next
    /// authenticated response fills it in.
    pub fn load(storage: &Storage) -> Self {
        let token = storage
            .load::<StoredSession>(SESSION_FILE)
            .map(|s| s.token)
            .filter(|t| !t.is_empty());
        Self { token, user: None }
    }

    pub fn login(&mut self, storage: &Storage, token: String, user: Option<User>) {
        if let Err(e) = storage.save(SESSION_FILE, &StoredSession { token: token.clone() }) {
            warn!("failed to persist session token: {e:#}");
        }
        self.token = Some(token);
        self.user = user;
    }

    pub fn logout(&mut self, storage: &Storage) {
        if let Err(e) = storage.remove(SESSION_FILE) {
            warn!("failed to clear persisted session: {e:#}");
        }
        self.token = None;
        self.user = None;
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Availability hint for admin-only affordances. Authorization stays
    /// server-side.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}
