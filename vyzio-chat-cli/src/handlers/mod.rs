//! Shared handlers for CLI commands.

pub mod chat;
pub mod user;
