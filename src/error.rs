//! Custom error types for reel-rs
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the reel-rs application
#[derive(Error, Debug)]
pub enum ReelError {
    /// TMDB rejected the username/password pair
    #[error("Invalid username or password.\n\n  → Check your TMDB credentials and try again.")]
    InvalidCredentials,

    /// TMDB rejected the request token during the exchange
    #[error("The login request token was rejected: {0}\n\n  → Sign in again to request a new token.")]
    RequestTokenRejected(String),

    /// Authentication process failed
    #[error("TMDB authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No API key configured
    #[error("TMDB API key is not set up.\n\n  → Get an API key from https://www.themoviedb.org/settings/api\n  → Run 'reel config set api-key YOUR_KEY' or set TMDB_API_KEY.")]
    ApiKeyNotConfigured,

    /// TMDB rejected the API key
    #[error("TMDB rejected the API key: {0}\n\n  → Check it with 'reel config get api-key'.")]
    InvalidApiKey(String),

    /// TMDB API error
    #[error("TMDB API request failed ({status}): {message}\n\n  → Check your internet connection.")]
    TmdbApi {
        /// HTTP status code
        status: u16,
        /// Message reported by TMDB
        message: String,
    },

    /// Credential storage error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error
    #[error("Network request failed: {0}\n\n  → Check your internet connection.")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Malformed API base URL
    #[error("Invalid API URL: {0}\n\n  → Expected format: https://api.themoviedb.org/3")]
    InvalidUrl(#[from] url::ParseError),

    /// Terminal/TUI error
    #[error("Terminal error: {0}\n\n  → Try resizing your terminal or restarting it.")]
    Terminal(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),
}

impl From<keyring::Error> for ReelError {
    fn from(err: keyring::Error) -> Self {
        ReelError::Credential(err.to_string())
    }
}

impl From<toml::de::Error> for ReelError {
    fn from(err: toml::de::Error) -> Self {
        ReelError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ReelError {
    fn from(err: toml::ser::Error) -> Self {
        ReelError::Toml(err.to_string())
    }
}

/// Result type alias using ReelError
pub type Result<T> = std::result::Result<T, ReelError>;
