//! Rust client for the Vyzio Ads marketplace chat.
//!
//! The [`session`] module carries the interesting part: an optimistic
//! open/reconcile/poll/send engine that keeps a local conversation store
//! eventually consistent with the server.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod session;

// Re-export main types
pub use client::{AuthInfo, HttpConfig, VyzioClient, VyzioClientBuilder};
pub use error::{Error, Result};

// Re-export commonly used models
pub use models::{AdId, ChatHandle, ChatId, Conversation, Message, MessageId, Profile, Role, UserId};

// Re-export the session engine
pub use session::{ChatPoller, ChatSession, ChatTransport, PollerConfig};
