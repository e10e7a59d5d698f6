//! Sign-in pipeline and the collaborators it depends on
//!
//! The sign-in screen never talks to TMDB or the keyring directly. It goes
//! through these traits so the flow can run against mocks:
//! - [`RequestTokenSource`] hands out short-lived login tokens
//! - [`CredentialExchange`] trades username/password/token for a session
//! - [`SessionStore`] persists the session between launches

pub mod validation;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tracing::debug;

use crate::error::Result;

pub use validation::{validate_sign_in, Field, FieldErrors};

/// Username and password captured when the form is submitted
#[derive(Debug, Clone)]
pub struct SignInCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Short-lived token that must accompany the credentials
#[derive(Debug, Clone)]
pub struct RequestToken {
    /// Opaque token value
    pub value: SecretString,
}

impl RequestToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: SecretString::from(value.into()),
        }
    }
}

/// Input of the credential exchange; consumed by it
#[derive(Debug)]
pub struct TokenLogin {
    pub username: String,
    pub password: SecretString,
    pub request_token: RequestToken,
}

/// An authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    /// Provider session identifier
    pub session_id: SecretString,
    /// Username the session was opened for
    pub username: String,
    /// When the session was established
    pub created_at: DateTime<Utc>,
}

/// Source of fresh login request tokens
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestTokenSource: Send + Sync {
    /// Request a new token; no request body is sent
    async fn new_request_token(&self) -> Result<RequestToken>;
}

/// Exchanges validated credentials for a session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Establish a session. Resolves only once the session is usable.
    async fn sign_in(&self, login: TokenLogin) -> Result<Session>;

    /// Tear the session down and forget it locally
    async fn sign_out(&self, session: &Session) -> Result<()>;
}

/// Persistence for the current session
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn save(&self, session: &Session) -> Result<()>;
    fn load(&self) -> Result<Option<Session>>;
    fn clear(&self) -> Result<()>;
}

/// Fetch a request token, then exchange it together with the credentials
///
/// The two calls are strictly sequential. If the token fetch fails the
/// exchange is never attempted.
pub async fn authenticate<T, E>(
    tokens: &T,
    exchange: &E,
    credentials: SignInCredentials,
) -> Result<Session>
where
    T: RequestTokenSource + ?Sized,
    E: CredentialExchange + ?Sized,
{
    debug!(username = %credentials.username, "requesting login token");
    let request_token = tokens.new_request_token().await?;

    debug!(username = %credentials.username, "exchanging credentials for a session");
    exchange
        .sign_in(TokenLogin {
            username: credentials.username,
            password: credentials.password,
            request_token,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelError;
    use mockall::Sequence;
    use secrecy::ExposeSecret;

    fn credentials(username: &str, password: &str) -> SignInCredentials {
        SignInCredentials {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    fn session(username: &str) -> Session {
        Session {
            session_id: SecretString::from("sess-1".to_string()),
            username: username.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_token_fetch_then_exchange() {
        let mut seq = Sequence::new();
        let mut tokens = MockRequestTokenSource::new();
        let mut exchange = MockCredentialExchange::new();

        tokens
            .expect_new_request_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(RequestToken::new("abc123")));
        exchange
            .expect_sign_in()
            .withf(|login| {
                login.username == "bob"
                    && login.password.expose_secret() == "pw"
                    && login.request_token.value.expose_secret() == "abc123"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|login| Ok(session(&login.username)));

        let result = authenticate(&tokens, &exchange, credentials("bob", "pw")).await;
        assert_eq!(result.unwrap().username, "bob");
    }

    #[tokio::test]
    async fn test_token_failure_skips_exchange() {
        let mut tokens = MockRequestTokenSource::new();
        let mut exchange = MockCredentialExchange::new();

        tokens.expect_new_request_token().times(1).returning(|| {
            Err(ReelError::TmdbApi {
                status: 503,
                message: "Service unavailable".to_string(),
            })
        });
        exchange.expect_sign_in().never();

        let result = authenticate(&tokens, &exchange, credentials("bob", "pw")).await;
        assert!(matches!(result, Err(ReelError::TmdbApi { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_exchange_failure_propagates() {
        let mut tokens = MockRequestTokenSource::new();
        let mut exchange = MockCredentialExchange::new();

        tokens
            .expect_new_request_token()
            .returning(|| Ok(RequestToken::new("abc123")));
        exchange
            .expect_sign_in()
            .times(1)
            .returning(|_| Err(ReelError::InvalidCredentials));

        let result = authenticate(&tokens, &exchange, credentials("bob", "wrong")).await;
        assert!(matches!(result, Err(ReelError::InvalidCredentials)));
    }
}
