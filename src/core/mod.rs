//! Core functionality for reel-rs
//!
//! This module contains shared infrastructure:
//! - Application configuration
//! - Credential management

pub mod config;
pub mod credentials;

pub use config::Config;
pub use credentials::CredentialStore;
