//! TUI screens

pub mod home;
pub mod sign_in;
