//! Terminal User Interface module
//!
//! This module contains the ratatui-based TUI implementation.

pub mod app;
pub mod event;
pub mod screens;
pub mod theme;
pub mod ui;

pub use app::{App, Navigator, Screen};
