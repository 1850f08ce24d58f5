//! Data models for marketplace chat entities.

mod conversation;
mod ids;
mod message;
mod user;

pub use conversation::{ChatHandle, Conversation};
pub use ids::{AdId, ChatId, MessageId, UserId};
pub use message::Message;
pub use user::{Profile, Role};
