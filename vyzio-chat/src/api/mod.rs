//! API modules.

mod chats;
mod messages;
mod users;

pub use chats::ChatApi;
pub use messages::{MessageApi, SendMessageBuilder};
pub use users::UserApi;
