//! TMDB API integration module
//!
//! This module provides all TMDB-related functionality:
//! - HTTP client for the v3 authentication endpoints
//! - Credential exchange and session persistence
//! - Error classification

pub mod auth;
pub mod client;
pub mod error_handler;

pub use auth::{KeyringSessionStore, TmdbAuthenticator};
pub use client::TmdbClient;
pub use error_handler::classify_tmdb_error;
