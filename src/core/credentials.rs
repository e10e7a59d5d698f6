//! Secure credential storage using the system keyring
//!
//! This module handles secure storage of sensitive credentials:
//! - The TMDB API key
//! - The TMDB session established at sign-in (serialized as JSON)
//!
//! Uses the system keyring (macOS Keychain, Linux Secret Service) with
//! in-memory caching to minimize keychain prompts.
//!
//! ## Environment Variable Fallback
//!
//! For development and CI, the API key can be set via `TMDB_API_KEY`.
//!
//! Priority: env var > cache > keyring

use std::sync::RwLock;

use keyring::Entry;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ReelError, Result};

const SERVICE_NAME: &str = "reel-rs";
const API_KEY_NAME: &str = "tmdb_api_key";
const SESSION_DATA_KEY: &str = "tmdb_session_data";

const API_KEY_ENV: &str = "TMDB_API_KEY";

/// TMDB v3 API keys are 32 hexadecimal characters
static API_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{32}$").expect("Invalid regex pattern for API key validation")
});

// In-memory credential cache
// Option<Option<T>>:
//   - None = not yet fetched from keyring
//   - Some(None) = fetched, but no credential exists
//   - Some(Some(value)) = fetched and cached
static API_KEY_CACHE: Lazy<RwLock<Option<Option<SecretString>>>> =
    Lazy::new(|| RwLock::new(None));
static SESSION_DATA_CACHE: Lazy<RwLock<Option<Option<SecretString>>>> =
    Lazy::new(|| RwLock::new(None));

/// Credential store for secure secret management
pub struct CredentialStore;

impl CredentialStore {
    // ─────────────────────────────────────────────────────────────────────────
    // TMDB API Key
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the TMDB API key securely
    pub fn store_api_key(key: &str) -> Result<()> {
        Self::write_entry(API_KEY_NAME, key, &API_KEY_CACHE)
    }

    /// Retrieve the TMDB API key
    ///
    /// Priority: environment variable > cache > keyring
    pub fn get_api_key() -> Result<Option<SecretString>> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(Some(SecretString::from(key)));
            }
        }

        Self::read_entry(API_KEY_NAME, &API_KEY_CACHE)
    }

    /// Delete the stored TMDB API key
    pub fn delete_api_key() -> Result<()> {
        Self::delete_entry(API_KEY_NAME, &API_KEY_CACHE)
    }

    /// Get the API key, returning an error if not configured
    pub fn require_api_key() -> Result<SecretString> {
        Self::get_api_key()?.ok_or(ReelError::ApiKeyNotConfigured)
    }

    /// Check that a value looks like a TMDB v3 API key
    pub fn is_valid_api_key(key: &str) -> bool {
        API_KEY_PATTERN.is_match(key)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // TMDB Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the serialized session
    pub fn store_session_data(json: &str) -> Result<()> {
        Self::write_entry(SESSION_DATA_KEY, json, &SESSION_DATA_CACHE)
    }

    /// Retrieve the serialized session, if any
    pub fn get_session_data() -> Result<Option<SecretString>> {
        Self::read_entry(SESSION_DATA_KEY, &SESSION_DATA_CACHE)
    }

    /// Delete the stored session
    pub fn delete_session_data() -> Result<()> {
        Self::delete_entry(SESSION_DATA_KEY, &SESSION_DATA_CACHE)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyring access
    // ─────────────────────────────────────────────────────────────────────────

    /// Write to the keyring and update the cache
    fn write_entry(
        name: &str,
        value: &str,
        cache: &RwLock<Option<Option<SecretString>>>,
    ) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, name)?;
        entry.set_password(value)?;

        if let Ok(mut cache) = cache.write() {
            *cache = Some(Some(SecretString::from(value.to_string())));
        }

        Ok(())
    }

    /// Read through the cache, falling back to the keyring
    fn read_entry(
        name: &str,
        cache: &RwLock<Option<Option<SecretString>>>,
    ) -> Result<Option<SecretString>> {
        if let Ok(cached) = cache.read() {
            if let Some(cached_value) = cached.as_ref() {
                return Ok(cached_value.clone());
            }
        }

        let entry = Entry::new(SERVICE_NAME, name)?;
        let result = match entry.get_password() {
            Ok(password) => Some(SecretString::from(password)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                return Err(ReelError::Credential(format!(
                    "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                    e
                )))
            }
        };

        if let Ok(mut cached) = cache.write() {
            *cached = Some(result.clone());
        }

        Ok(result)
    }

    /// Delete from the keyring and clear the cache
    fn delete_entry(name: &str, cache: &RwLock<Option<Option<SecretString>>>) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, name)?;
        let result = match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(ReelError::Credential(e.to_string())),
        };

        if let Ok(mut cached) = cache.write() {
            *cached = Some(None);
        }

        result
    }

    /// Get a masked version of a secret for display (shows first 4 and last 4 chars)
    pub fn mask_token(token: &SecretString) -> String {
        let exposed = token.expose_secret();
        let count = exposed.chars().count();
        if count <= 8 {
            "*".repeat(count)
        } else {
            let head: String = exposed.chars().take(4).collect();
            let tail: String = exposed.chars().skip(count - 4).collect();
            format!("{}...{}", head, tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        let short = SecretString::from("abc");
        assert_eq!(CredentialStore::mask_token(&short), "***");

        let long = SecretString::from("0123456789abcdef0123456789abcdef");
        assert_eq!(CredentialStore::mask_token(&long), "0123...cdef");
    }

    #[test]
    fn test_mask_token_non_ascii() {
        let short = SecretString::from("aéééééé");
        assert_eq!(CredentialStore::mask_token(&short), "*******");

        let long = SecretString::from("ключ-для-tmdb-éèê");
        assert_eq!(CredentialStore::mask_token(&long), "ключ...-éèê");
    }

    #[test]
    fn test_api_key_format() {
        assert!(CredentialStore::is_valid_api_key(
            "0123456789abcdef0123456789ABCDEF"
        ));
        assert!(!CredentialStore::is_valid_api_key("too-short"));
        assert!(!CredentialStore::is_valid_api_key(
            "0123456789abcdef0123456789abcdeg"
        ));
        assert!(!CredentialStore::is_valid_api_key(""));
    }

    #[test]
    fn test_api_key_from_env() {
        // Env var path avoids keyring access
        std::env::set_var(API_KEY_ENV, "0123456789abcdef0123456789abcdef");
        let key = CredentialStore::require_api_key().unwrap();
        assert_eq!(key.expose_secret(), "0123456789abcdef0123456789abcdef");
        std::env::remove_var(API_KEY_ENV);
    }
}
