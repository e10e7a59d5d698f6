//! TMDB API error detection and classification
//!
//! TMDB reports failures as `{ "status_code": n, "status_message": "..." }`
//! alongside a non-2xx HTTP status. The numeric code is more specific than
//! the HTTP status, so it drives the mapping to `ReelError`.

use serde::Deserialize;

use crate::error::ReelError;

/// Invalid API key: You must be granted a valid key
const STATUS_INVALID_API_KEY: i64 = 7;
/// Your API key has been suspended
const STATUS_SUSPENDED_API_KEY: i64 = 10;
/// Invalid username and/or password
const STATUS_INVALID_CREDENTIALS: i64 = 30;
/// Email not verified
const STATUS_EMAIL_NOT_VERIFIED: i64 = 32;
/// Invalid request token
const STATUS_INVALID_REQUEST_TOKEN: i64 = 33;

/// Error payload returned by TMDB
#[derive(Debug, Deserialize)]
pub struct TmdbErrorBody {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Classifies a failed TMDB response into a specific ReelError
pub fn classify_tmdb_error(status: u16, body: &str) -> ReelError {
    let parsed = serde_json::from_str::<TmdbErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.status_code);
    let message = parsed
        .and_then(|b| b.status_message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback_message(status, body));

    match code {
        Some(STATUS_INVALID_CREDENTIALS) => ReelError::InvalidCredentials,
        Some(STATUS_INVALID_API_KEY) | Some(STATUS_SUSPENDED_API_KEY) => {
            ReelError::InvalidApiKey(message)
        }
        Some(STATUS_EMAIL_NOT_VERIFIED) => ReelError::AuthenticationFailed(message),
        Some(STATUS_INVALID_REQUEST_TOKEN) => ReelError::RequestTokenRejected(message),
        _ => ReelError::TmdbApi { status, message },
    }
}

/// Message for responses without a usable status_message
fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('<') {
        format!("HTTP {}", status)
    } else {
        body.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials() {
        let body = r#"{"success":false,"status_code":30,"status_message":"Invalid username and/or password: You did not provide a valid login."}"#;
        assert!(matches!(
            classify_tmdb_error(401, body),
            ReelError::InvalidCredentials
        ));
    }

    #[test]
    fn test_invalid_api_key() {
        let body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key."}"#;
        match classify_tmdb_error(401, body) {
            ReelError::InvalidApiKey(msg) => assert!(msg.starts_with("Invalid API key")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejected_request_token() {
        let body = r#"{"status_code":33,"status_message":"Invalid request token."}"#;
        assert!(matches!(
            classify_tmdb_error(401, body),
            ReelError::RequestTokenRejected(_)
        ));
    }

    #[test]
    fn test_unknown_code_keeps_status() {
        let body = r#"{"status_code":11,"status_message":"Internal error"}"#;
        match classify_tmdb_error(500, body) {
            ReelError::TmdbApi { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body() {
        match classify_tmdb_error(502, "<html>Bad Gateway</html>") {
            ReelError::TmdbApi { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "HTTP 502");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
