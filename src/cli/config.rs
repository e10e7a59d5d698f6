//! Configuration CLI command handlers

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::{Config, DEFAULT_API_BASE_URL};
use crate::core::credentials::CredentialStore;
use crate::error::{ReelError, Result};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    match key {
        ConfigKey::ApiKey => {
            let value = value.trim();
            if !CredentialStore::is_valid_api_key(value) {
                return Err(ReelError::InvalidInput(
                    "Invalid API key. A TMDB v3 API key is 32 hexadecimal characters.".to_string(),
                ));
            }
            CredentialStore::store_api_key(value)?;
            println!("TMDB API key has been stored securely.");
        }
        ConfigKey::ApiUrl => {
            let mut config = Config::load()?;
            config.set_api_base_url(&value)?;
            config.save()?;
            println!("TMDB API URL set to: {}", config.api_base_url);
        }
    }
    Ok(())
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    match key {
        ConfigKey::ApiKey => {
            if let Some(key) = CredentialStore::get_api_key()? {
                println!("TMDB API key: {}", CredentialStore::mask_token(&key));
            } else {
                println!("TMDB API key: Not configured");
            }
        }
        ConfigKey::ApiUrl => {
            let config = Config::load()?;
            println!("TMDB API URL: {}", config.api_base_url);
        }
    }
    Ok(())
}

/// Handle removing a configuration value
fn handle_remove(key: ConfigKey) -> Result<()> {
    match key {
        ConfigKey::ApiKey => {
            CredentialStore::delete_api_key()?;
            println!("TMDB API key has been removed.");
        }
        ConfigKey::ApiUrl => {
            let mut config = Config::load()?;
            config.api_base_url = DEFAULT_API_BASE_URL.to_string();
            config.save()?;
            println!("TMDB API URL reset to default: {}", DEFAULT_API_BASE_URL);
        }
    }
    Ok(())
}
