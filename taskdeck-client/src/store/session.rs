/// Authentication session store
///
/// The session is the only entity whose canonical copy lives on the client.
/// It is restored from durable storage on construction and written back on
/// every transition. Transitions are atomic: a reader either sees the full
/// authenticated state or the full cleared state, never a partial one,
/// because writers hold the lock for the whole transition.
///
/// The persisted payload is a strict subset of the in-memory state: the
/// transient `is_loading` flag is never written out.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskdeck_client::store::{MemoryStorage, SessionStore};
///
/// let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
/// assert!(!store.is_authenticated());
/// ```

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use taskdeck_shared::models::user::User;

use super::backend::StorageBackend;

/// Storage namespace for the persisted session
const NAMESPACE: &str = "auth-storage";

/// In-memory session state
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The authenticated user, if any
    pub user: Option<User>,

    /// Bearer token for API requests
    pub access_token: Option<String>,

    /// Token used to obtain fresh access tokens
    pub refresh_token: Option<String>,

    /// Whether a session is established
    pub is_authenticated: bool,

    /// Whether an auth mutation is currently pending (transient, never persisted)
    pub is_loading: bool,
}

/// Persisted subset of the session state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    user: Option<User>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    is_authenticated: bool,
}

/// Process-wide authentication session
///
/// Cheap to clone via `Arc`; every component that needs the current token or
/// user receives a handle at construction time.
pub struct SessionStore {
    state: RwLock<SessionState>,
    backend: Arc<dyn StorageBackend>,
}

impl SessionStore {
    /// Restores the session from durable storage
    ///
    /// This is a pure deserialize: no network call is made, and a missing or
    /// corrupt payload yields the unauthenticated initial state. Corrupt
    /// payloads are logged and discarded rather than propagated: losing a
    /// session is recoverable, crashing on startup is not.
    pub fn restore(backend: Arc<dyn StorageBackend>) -> Self {
        let state = match backend.load(NAMESPACE) {
            Ok(Some(payload)) => match serde_json::from_str::<PersistedSession>(&payload) {
                Ok(persisted) => SessionState {
                    user: persisted.user,
                    access_token: persisted.access_token,
                    refresh_token: persisted.refresh_token,
                    is_authenticated: persisted.is_authenticated,
                    is_loading: false,
                },
                Err(err) => {
                    tracing::warn!(error = %err, "discarding corrupt persisted session");
                    SessionState::default()
                }
            },
            Ok(None) => SessionState::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted session");
                SessionState::default()
            }
        };

        Self { state: RwLock::new(state), backend }
    }

    /// Transitions to the authenticated state
    ///
    /// All fields change together; `is_loading` is reset.
    pub fn set_auth(&self, user: User, access_token: String, refresh_token: String) {
        {
            let mut state = self.state.write().unwrap();
            *state = SessionState {
                user: Some(user),
                access_token: Some(access_token),
                refresh_token: Some(refresh_token),
                is_authenticated: true,
                is_loading: false,
            };
        }
        self.persist();
    }

    /// Resets to the unauthenticated initial state
    pub fn clear_auth(&self) {
        {
            let mut state = self.state.write().unwrap();
            *state = SessionState::default();
        }
        self.persist();
    }

    /// Sets the transient loading flag
    pub fn set_loading(&self, loading: bool) {
        self.state.write().unwrap().is_loading = loading;
    }

    /// Replaces the stored user record (e.g. after a profile update)
    ///
    /// A no-op when unauthenticated.
    pub fn update_user(&self, user: User) {
        {
            let mut state = self.state.write().unwrap();
            if !state.is_authenticated {
                return;
            }
            state.user = Some(user);
        }
        self.persist();
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// The current user, if authenticated
    pub fn current_user(&self) -> Option<User> {
        self.state.read().unwrap().user.clone()
    }

    /// The current access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.state.read().unwrap().access_token.clone()
    }

    /// The current refresh token, if any
    pub fn refresh_token(&self) -> Option<String> {
        self.state.read().unwrap().refresh_token.clone()
    }

    /// Whether a session is established
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().is_authenticated
    }

    /// Writes the persisted subset back to storage
    ///
    /// Persistence failures are logged, never fatal: the in-memory session
    /// stays consistent and the worst case is a logout on next start.
    fn persist(&self) {
        let persisted = {
            let state = self.state.read().unwrap();
            PersistedSession {
                user: state.user.clone(),
                access_token: state.access_token.clone(),
                refresh_token: state.refresh_token.clone(),
                is_authenticated: state.is_authenticated,
            }
        };

        match serde_json::to_string(&persisted) {
            Ok(payload) => {
                if let Err(err) = self.backend.save(NAMESPACE, &payload) {
                    tracing::warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::MemoryStorage;
    use chrono::Utc;
    use taskdeck_shared::models::user::{UserRole, UserStatus};

    fn sample_user(id: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: format!("{}@example.com", id),
            role: UserRole::User,
            status: UserStatus::Active,
            avatar: None,
            phone: None,
            job_title: None,
            department: None,
            location: None,
            organization_id: None,
            is_active: true,
            email_verified: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
            organization: None,
            counts: None,
        }
    }

    #[test]
    fn test_initial_state_is_unauthenticated() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
        let state = store.snapshot();
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(state.refresh_token.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_set_auth_transitions_atomically() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
        store.set_loading(true);
        store.set_auth(sample_user("u1"), "at-1".to_string(), "rt-1".to_string());

        let state = store.snapshot();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.user.unwrap().id, "u1");
        assert_eq!(state.access_token.as_deref(), Some("at-1"));
        assert_eq!(state.refresh_token.as_deref(), Some("rt-1"));
    }

    #[test]
    fn test_clear_auth_resets_everything() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
        store.set_auth(sample_user("u1"), "at-1".to_string(), "rt-1".to_string());
        store.clear_auth();

        let state = store.snapshot();
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(state.refresh_token.is_none());
        assert!(!state.is_authenticated);
    }

    #[test]
    fn test_session_round_trip_through_storage() {
        let backend = Arc::new(MemoryStorage::new());

        let store = SessionStore::restore(backend.clone());
        store.set_auth(sample_user("u1"), "at-1".to_string(), "rt-1".to_string());
        drop(store);

        // A fresh store over the same backend restores the session verbatim.
        let restored = SessionStore::restore(backend);
        assert!(restored.is_authenticated());
        assert_eq!(restored.access_token().as_deref(), Some("at-1"));
        assert_eq!(restored.refresh_token().as_deref(), Some("rt-1"));
        assert_eq!(restored.current_user().unwrap().id, "u1");
    }

    #[test]
    fn test_is_loading_is_not_persisted() {
        let backend = Arc::new(MemoryStorage::new());
        let store = SessionStore::restore(backend.clone());
        store.set_auth(sample_user("u1"), "at-1".to_string(), "rt-1".to_string());
        store.set_loading(true);

        let payload = backend.load("auth-storage").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("isLoading"));
        assert!(!object.contains_key("is_loading"));
        assert_eq!(object["isAuthenticated"], serde_json::json!(true));
    }

    #[test]
    fn test_corrupt_payload_yields_initial_state() {
        let backend = Arc::new(MemoryStorage::new());
        backend.save("auth-storage", "not json").unwrap();

        let store = SessionStore::restore(backend);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_update_user_requires_session() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
        store.update_user(sample_user("u1"));
        assert!(store.current_user().is_none());

        store.set_auth(sample_user("u1"), "at".to_string(), "rt".to_string());
        let mut updated = sample_user("u1");
        updated.first_name = "Grace".to_string();
        store.update_user(updated);
        assert_eq!(store.current_user().unwrap().first_name, "Grace");
    }
}
