//! TMDB credential exchange and session persistence
//!
//! [`TmdbAuthenticator`] validates the request token with the user's login,
//! opens a session and hands it to a [`SessionStore`]. The keyring-backed
//! store keeps the session as versioned JSON.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{CredentialExchange, Session, SessionStore, TokenLogin};
use crate::core::credentials::CredentialStore;
use crate::error::{ReelError, Result};
use crate::tmdb::client::TmdbClient;

/// Current on-disk format of [`StoredSession`]
const STORED_SESSION_VERSION: u8 = 1;

/// Serializable format for keyring storage
///
/// Uses plain strings since SecretString doesn't implement Serialize.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: String,
    pub username: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// Version for future migrations
    pub version: u8,
}

impl StoredSession {
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.session_id.expose_secret().to_string(),
            username: session.username.clone(),
            created_at: session.created_at.to_rfc3339(),
            version: STORED_SESSION_VERSION,
        }
    }

    pub fn into_session(self) -> Result<Session> {
        if self.version != STORED_SESSION_VERSION {
            return Err(ReelError::Config(format!(
                "Unsupported stored session version {}. Sign in again.",
                self.version
            )));
        }

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| ReelError::Config(format!("Invalid session timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(Session {
            session_id: SecretString::from(self.session_id),
            username: self.username,
            created_at,
        })
    }
}

/// Session store backed by the system keyring
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringSessionStore;

impl SessionStore for KeyringSessionStore {
    fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(&StoredSession::from_session(session))?;
        CredentialStore::store_session_data(&json)
    }

    fn load(&self) -> Result<Option<Session>> {
        match CredentialStore::get_session_data()? {
            Some(json) => {
                let stored: StoredSession = serde_json::from_str(json.expose_secret())
                    .map_err(|e| ReelError::Config(format!("Invalid stored session: {}", e)))?;
                Ok(Some(stored.into_session()?))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        CredentialStore::delete_session_data()
    }
}

/// Credential exchange against the TMDB authentication endpoints
pub struct TmdbAuthenticator<S> {
    client: Arc<TmdbClient>,
    store: S,
}

impl<S: SessionStore> TmdbAuthenticator<S> {
    pub fn new(client: Arc<TmdbClient>, store: S) -> Self {
        Self { client, store }
    }

    /// The session persisted by a previous sign-in, if any
    pub fn stored_session(&self) -> Result<Option<Session>> {
        self.store.load()
    }
}

#[async_trait]
impl<S: SessionStore> CredentialExchange for TmdbAuthenticator<S> {
    async fn sign_in(&self, login: TokenLogin) -> Result<Session> {
        let validated = self
            .client
            .validate_with_login(&login.username, &login.password, &login.request_token)
            .await?;
        let session_id = self.client.create_session(&validated).await?;

        let session = Session {
            session_id,
            username: login.username,
            created_at: Utc::now(),
        };
        self.store.save(&session)?;

        info!(username = %session.username, "signed in to TMDB");
        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        // A stale session on the server is harmless; the local copy is what matters
        if let Err(e) = self.client.delete_session(&session.session_id).await {
            warn!(error = %e, "failed to delete TMDB session");
        }

        self.store.clear()?;
        info!(username = %session.username, "signed out of TMDB");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockSessionStore, RequestToken};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Arc<TmdbClient> {
        Arc::new(
            TmdbClient::new(
                &server.uri(),
                SecretString::from("0123456789abcdef0123456789abcdef"),
                Duration::from_secs(5),
            )
            .unwrap(),
        )
    }

    fn login(password: &str) -> TokenLogin {
        TokenLogin {
            username: "bob".to_string(),
            password: SecretString::from(password.to_string()),
            request_token: RequestToken::new("abc123"),
        }
    }

    #[tokio::test]
    async fn test_sign_in_opens_and_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authentication/token/validate_with_login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "request_token": "abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/authentication/session/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "session_id": "sess-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .withf(|s| s.username == "bob" && s.session_id.expose_secret() == "sess-1")
            .times(1)
            .returning(|_| Ok(()));

        let auth = TmdbAuthenticator::new(client_for(&server), store);
        let session = auth.sign_in(login("pw")).await.unwrap();
        assert_eq!(session.username, "bob");
    }

    #[tokio::test]
    async fn test_wrong_password_stores_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authentication/token/validate_with_login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "status_code": 30,
                "status_message": "Invalid username and/or password: You did not provide a valid login."
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/authentication/session/new"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut store = MockSessionStore::new();
        store.expect_save().never();

        let auth = TmdbAuthenticator::new(client_for(&server), store);
        let result = auth.sign_in(login("wrong")).await;
        assert!(matches!(result, Err(ReelError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_out_clears_store_even_if_remote_fails() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/authentication/session"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut store = MockSessionStore::new();
        store.expect_clear().times(1).returning(|| Ok(()));

        let auth = TmdbAuthenticator::new(client_for(&server), store);
        let session = Session {
            session_id: SecretString::from("sess-1"),
            username: "bob".to_string(),
            created_at: Utc::now(),
        };
        auth.sign_out(&session).await.unwrap();
    }

    #[test]
    fn test_stored_session_rejects_bad_timestamp() {
        let stored = StoredSession {
            session_id: "sess-1".to_string(),
            username: "bob".to_string(),
            created_at: "yesterday".to_string(),
            version: STORED_SESSION_VERSION,
        };
        assert!(matches!(stored.into_session(), Err(ReelError::Config(_))));
    }

    #[test]
    fn test_stored_session_rejects_unknown_version() {
        let stored = StoredSession {
            session_id: "sess-1".to_string(),
            username: "bob".to_string(),
            created_at: Utc::now().to_rfc3339(),
            version: STORED_SESSION_VERSION + 1,
        };
        match stored.into_session() {
            Err(ReelError::Config(msg)) => assert!(msg.contains("version")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_stored_session_json_round_trip() {
        let session = Session {
            session_id: SecretString::from("79191836ddaa0da3df76a5ffef6f07ad6ab0c641"),
            username: "bob".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&StoredSession::from_session(&session)).unwrap();
        assert!(json.contains("\"version\":1"));

        let restored = serde_json::from_str::<StoredSession>(&json)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(
            restored.session_id.expose_secret(),
            session.session_id.expose_secret()
        );
        assert_eq!(restored.username, "bob");
        assert_eq!(restored.created_at, session.created_at);
    }
}
