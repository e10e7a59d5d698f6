//! reel-rs - A TUI application for signing in to The Movie Database
//!
//! This library provides both CLI and TUI interfaces for the TMDB sign-in
//! flow: form validation, the request-token/session exchange, and session
//! storage in the system keyring.

pub mod auth;
pub mod cli;
pub mod core;
pub mod error;
pub mod tmdb;
pub mod tui;

pub use error::{ReelError, Result};
