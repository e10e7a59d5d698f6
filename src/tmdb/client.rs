//! TMDB API client for the v3 authentication endpoints
//!
//! Login on TMDB v3 is a three step dance:
//! 1. `GET /authentication/token/new` hands out a short-lived request token
//! 2. `POST /authentication/token/validate_with_login` binds it to a user
//! 3. `POST /authentication/session/new` trades the bound token for a session
//!
//! Every request carries the `api_key` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::auth::{RequestToken, RequestTokenSource};
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::error::{ReelError, Result};
use crate::tmdb::error_handler::classify_tmdb_error;

/// Request token response
#[derive(Debug, Deserialize)]
struct RequestTokenResponse {
    request_token: String,
}

/// Session creation response
#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_id: String,
}

/// Plain `{ success }` response
#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    status_message: Option<String>,
}

/// validate_with_login request body
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    request_token: &'a str,
}

/// session/new request body
#[derive(Serialize)]
struct SessionRequest<'a> {
    request_token: &'a str,
}

/// DELETE session request body
#[derive(Serialize)]
struct DeleteSessionRequest<'a> {
    session_id: &'a str,
}

/// TMDB API client
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl TmdbClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: &str, api_key: SecretString, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ReelError::Config(format!(
                "API URL '{}' cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Create a client from the stored configuration and API key
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = CredentialStore::require_api_key()?;
        Self::new(&config.api_base_url, api_key, config.request_timeout())
    }

    /// Build the URL for an endpoint path such as `authentication/token/new`
    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReelError::Config("API URL cannot be used as a base URL".into()))?
            .pop_if_empty()
            .extend(path.split('/'));
        url.query_pairs_mut()
            .append_pair("api_key", self.api_key.expose_secret());
        Ok(url)
    }

    /// Send a request and decode the JSON body, classifying TMDB failures
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_tmdb_error(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }

    /// Request a fresh, unauthorized request token
    pub async fn request_token(&self) -> Result<RequestToken> {
        debug!("GET authentication/token/new");
        let url = self.endpoint("authentication/token/new")?;
        let response: RequestTokenResponse = self.send(self.client.get(url)).await?;
        Ok(response.into_token())
    }

    /// Bind a request token to the user's username and password
    pub async fn validate_with_login(
        &self,
        username: &str,
        password: &SecretString,
        request_token: &RequestToken,
    ) -> Result<RequestToken> {
        debug!(username, "POST authentication/token/validate_with_login");
        let url = self.endpoint("authentication/token/validate_with_login")?;
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
            request_token: request_token.value.expose_secret(),
        };
        let response: RequestTokenResponse =
            self.send(self.client.post(url).json(&body)).await?;
        Ok(response.into_token())
    }

    /// Exchange a validated request token for a session id
    pub async fn create_session(&self, request_token: &RequestToken) -> Result<SecretString> {
        debug!("POST authentication/session/new");
        let url = self.endpoint("authentication/session/new")?;
        let body = SessionRequest {
            request_token: request_token.value.expose_secret(),
        };
        let response: SessionResponse = self.send(self.client.post(url).json(&body)).await?;
        Ok(SecretString::from(response.session_id))
    }

    /// Invalidate a session on the server
    pub async fn delete_session(&self, session_id: &SecretString) -> Result<()> {
        debug!("DELETE authentication/session");
        let url = self.endpoint("authentication/session")?;
        let body = DeleteSessionRequest {
            session_id: session_id.expose_secret(),
        };
        let response: StatusResponse = self.send(self.client.delete(url).json(&body)).await?;

        if response.success {
            Ok(())
        } else {
            Err(ReelError::AuthenticationFailed(
                response
                    .status_message
                    .unwrap_or_else(|| "Session could not be deleted".to_string()),
            ))
        }
    }
}

#[async_trait]
impl RequestTokenSource for TmdbClient {
    async fn new_request_token(&self) -> Result<RequestToken> {
        self.request_token().await
    }
}

impl RequestTokenResponse {
    fn into_token(self) -> RequestToken {
        RequestToken {
            value: SecretString::from(self.request_token),
        }
    }
}
