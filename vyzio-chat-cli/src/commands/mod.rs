//! CLI command definitions.

pub mod chat;
pub mod user;
