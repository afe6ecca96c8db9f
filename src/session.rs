//! Session gate — credential verification and token-keyed session store
//!
//! Sessions are process-local and reset on restart. There is no expiry and
//! no durable store; a token is valid from login until logout or shutdown.
//! Credentials come from a [`CredentialProvider`] injected at startup so the
//! check is configurable and testable rather than a source literal.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::Error;

/// Verifies a username/password pair.
pub trait CredentialProvider: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Static single-user credentials from configuration.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(auth: &AuthConfig) -> Self {
        Self {
            username: auth.username.clone(),
            password: auth.password.clone(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// One authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Token-keyed in-memory session store.
pub struct SessionStore {
    provider: Arc<dyn CredentialProvider>,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Verify credentials and open a session.
    ///
    /// A failed attempt leaves the store unchanged and is non-fatal; the
    /// caller re-prompts.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, Error> {
        if !self.provider.verify(username, password) {
            warn!(username, "Login rejected");
            return Err(Error::InvalidCredentials);
        }

        let session = Session {
            token: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());
        info!(username, "Login successful");
        Ok(session)
    }

    pub async fn is_authenticated(&self, token: &Uuid) -> bool {
        self.sessions.read().await.contains_key(token)
    }

    /// Close a session. Returns whether the token was known.
    pub async fn logout(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SessionStore {
        let auth = AuthConfig {
            username: "admin".to_string(),
            password: "password".to_string(),
        };
        SessionStore::new(Arc::new(StaticCredentials::new(&auth)))
    }

    #[tokio::test]
    async fn test_valid_credentials_open_session() {
        let store = test_store();
        let session = store.login("admin", "password").await.unwrap();
        assert!(store.is_authenticated(&session.token).await);
    }

    #[tokio::test]
    async fn test_invalid_pairs_are_rejected() {
        let store = test_store();
        for (user, pass) in [
            ("admin", "wrong"),
            ("wrong", "password"),
            ("", ""),
            ("ADMIN", "password"),
        ] {
            let err = store.login(user, pass).await.unwrap_err();
            assert!(matches!(err, Error::InvalidCredentials));
        }
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_repeated_failures_leave_store_unchanged() {
        let store = test_store();
        let session = store.login("admin", "password").await.unwrap();
        for _ in 0..5 {
            let _ = store.login("admin", "nope").await;
        }
        assert_eq!(store.active_count().await, 1);
        assert!(store.is_authenticated(&session.token).await);
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let store = test_store();
        let session = store.login("admin", "password").await.unwrap();
        assert!(store.logout(&session.token).await);
        assert!(!store.is_authenticated(&session.token).await);
        assert!(!store.logout(&session.token).await);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_authenticated() {
        let store = test_store();
        assert!(!store.is_authenticated(&Uuid::new_v4()).await);
    }
}
