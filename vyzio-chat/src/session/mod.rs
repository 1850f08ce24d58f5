//! Chat session engine.
//!
//! One [`ChatSession`] holds everything a chat view needs: the conversation
//! list, the message list of the open conversation, the compose draft, and
//! the single-flight send guard. Network access goes through
//! [`ChatTransport`].

mod merge;
mod poller;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use poller::{ChatPoller, PollerConfig};
pub use transport::ChatTransport;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{AdId, ChatId, Conversation, Message, Role, UserId};

/// Local state of one user session.
#[derive(Default)]
struct SessionState {
    conversations: Vec<Conversation>,
    /// Correlation key of the currently open conversation.
    open: Option<AdId>,
    /// Messages of the open conversation, replaced wholesale on each poll.
    messages: Vec<Message>,
    /// Compose field contents; cleared only on a successful send.
    draft: String,
    /// Single-flight guard for sends.
    sending: bool,
}

impl SessionState {
    fn conversation(&self, ad_id: &AdId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.ad_id == *ad_id)
    }

    fn open_chat_id(&self) -> Option<ChatId> {
        self.open
            .as_ref()
            .and_then(|ad| self.conversation(ad))
            .and_then(|c| c.chat_id())
            .cloned()
    }
}

/// Session-scoped store for marketplace chat, parameterized by role.
///
/// All methods take `&self`; state lives behind a mutex that is never held
/// across an await point.
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    user_id: UserId,
    role: Role,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// Create a session for a user.
    pub fn new(transport: Arc<dyn ChatTransport>, user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            transport,
            user_id: user_id.into(),
            role,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// The session user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The session role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Snapshot of the conversation list.
    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().unwrap().conversations.clone()
    }

    /// Snapshot of one conversation by advertisement id.
    pub fn conversation(&self, ad_id: &AdId) -> Option<Conversation> {
        self.state.lock().unwrap().conversation(ad_id).cloned()
    }

    /// Snapshot of one conversation by server chat id.
    pub fn find_by_chat_id(&self, chat_id: &ChatId) -> Option<Conversation> {
        self.state
            .lock()
            .unwrap()
            .conversations
            .iter()
            .find(|c| c.chat_id() == Some(chat_id))
            .cloned()
    }

    /// Correlation key of the open conversation, if any.
    pub fn open_ad(&self) -> Option<AdId> {
        self.state.lock().unwrap().open.clone()
    }

    /// Whether a conversation is currently open.
    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().open.is_some()
    }

    /// Server id of the open conversation, once confirmed.
    pub fn open_chat_id(&self) -> Option<ChatId> {
        self.state.lock().unwrap().open_chat_id()
    }

    /// Snapshot of the open conversation's messages.
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    /// Current compose draft.
    pub fn draft(&self) -> String {
        self.state.lock().unwrap().draft.clone()
    }

    /// Replace the compose draft.
    pub fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().unwrap().draft = text.into();
    }

    /// Fetch the conversation list and merge it into local state.
    ///
    /// On transport failure the previous list is retained unchanged; the
    /// error is logged and returned, never applied to state.
    pub async fn refresh_conversations(&self) -> Result<()> {
        match self
            .transport
            .list_conversations(&self.user_id, self.role)
            .await
        {
            Ok(incoming) => {
                let mut state = self.state.lock().unwrap();
                let local = std::mem::take(&mut state.conversations);
                state.conversations = merge::merge_server_list(local, incoming);
                Ok(())
            }
            Err(e) => {
                warn!("conversation list refresh failed: {e}");
                Err(e)
            }
        }
    }

    /// Open a conversation with a counterpart about an advertisement,
    /// optimistically and without any network round trip.
    ///
    /// Inserts (or merges into) the local entry for the advertisement, marks
    /// it open, and returns a snapshot. When no cached counterpart name is
    /// supplied, a role-based placeholder is shown until the server says
    /// otherwise; [`ChatSession::counterpart_name`] can fill it in.
    pub fn contact(
        &self,
        ad_id: impl Into<AdId>,
        ad_title: impl Into<String>,
        counterpart_id: impl Into<UserId>,
        cached_name: Option<&str>,
    ) -> Conversation {
        let name = cached_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| self.role.counterpart_label().to_owned());

        let pending = Conversation::pending(ad_id, ad_title, counterpart_id, name);
        let ad = pending.ad_id.clone();

        let mut state = self.state.lock().unwrap();
        let idx = merge::upsert_pending(&mut state.conversations, pending);
        if state.open.as_ref() != Some(&ad) {
            state.open = Some(ad);
            state.messages.clear();
        }
        state.conversations[idx].clone()
    }

    /// Resolve a conversation to its server-assigned identifier, creating it
    /// remotely if still pending.
    ///
    /// Already-confirmed conversations resolve without any network call. On
    /// failure the entry stays pending and no retry is scheduled; the next
    /// send attempt will retry creation.
    pub async fn confirm(&self, ad_id: &AdId) -> Result<ChatId> {
        let counterpart = {
            let state = self.state.lock().unwrap();
            let conv = state
                .conversation(ad_id)
                .ok_or_else(|| Error::invalid(format!("No conversation for ad {ad_id}")))?;
            if let Some(id) = conv.chat_id() {
                return Ok(id.clone());
            }
            conv.counterpart_id
                .clone()
                .ok_or_else(|| Error::missing("counterpart id"))?
        };

        let (buyer, seller) = match self.role {
            Role::Buyer => (self.user_id.clone(), counterpart),
            Role::Seller => (counterpart, self.user_id.clone()),
        };

        match self
            .transport
            .create_conversation(&buyer, &seller, ad_id, self.role)
            .await
        {
            Ok(confirmed) => {
                let chat_id = confirmed
                    .chat_id()
                    .cloned()
                    .ok_or_else(|| Error::missing("id"))?;
                let mut state = self.state.lock().unwrap();
                let local = std::mem::take(&mut state.conversations);
                state.conversations = merge::reconcile_confirmed(local, confirmed);
                Ok(chat_id)
            }
            Err(e) => {
                warn!("create-or-fetch failed for ad {ad_id}: {e}");
                Err(e)
            }
        }
    }

    /// Open an existing conversation. Returns false if unknown.
    pub fn open(&self, ad_id: &AdId) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.conversation(ad_id).is_none() {
            return false;
        }
        if state.open.as_ref() != Some(ad_id) {
            state.open = Some(ad_id.clone());
            state.messages.clear();
        }
        true
    }

    /// Close the open conversation and drop its message view.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.open = None;
        state.messages.clear();
    }

    /// Fetch messages for the open conversation and replace local state
    /// wholesale.
    ///
    /// A no-op while the conversation is pending (there is no identifier to
    /// query against) or when nothing is open. Responses that arrive after
    /// the open conversation changed are dropped.
    pub async fn refresh_messages(&self) -> Result<()> {
        let chat_id = match self.open_chat_id() {
            Some(id) => id,
            None => return Ok(()),
        };

        match self.transport.list_messages(&chat_id).await {
            Ok(messages) => {
                let mut state = self.state.lock().unwrap();
                if state.open_chat_id().as_ref() == Some(&chat_id) {
                    state.messages = messages;
                }
                Ok(())
            }
            Err(e) => {
                warn!("message refresh failed for chat {chat_id}: {e}");
                Err(e)
            }
        }
    }

    /// Send a message into the open conversation.
    ///
    /// The text must be non-empty after trimming, and only one send per
    /// session may be in flight. A pending conversation is created remotely
    /// first; if that fails the send aborts with no state change. On success
    /// the server echo is appended, the conversation's last-message fields
    /// are updated, and a best-effort mark-read follows.
    pub async fn send(&self, text: &str) -> Result<Message> {
        let text = text.trim().to_owned();
        if text.is_empty() {
            return Err(Error::invalid("Message text cannot be empty"));
        }

        let ad_id = {
            let mut state = self.state.lock().unwrap();
            if state.sending {
                return Err(Error::SendInFlight);
            }
            let ad = state
                .open
                .clone()
                .ok_or_else(|| Error::invalid("No open conversation"))?;
            state.sending = true;
            ad
        };

        let result = self.send_inner(&ad_id, &text).await;

        let mut state = self.state.lock().unwrap();
        state.sending = false;
        if let Ok(message) = &result {
            if state.open.as_ref() == Some(&ad_id) {
                state.messages.push(message.clone());
            }
            if let Some(conv) = state.conversations.iter_mut().find(|c| c.ad_id == ad_id) {
                conv.last_message = message.text.clone();
                conv.last_message_time = message.created_at.or_else(|| Some(Utc::now()));
            }
        }
        result
    }

    async fn send_inner(&self, ad_id: &AdId, text: &str) -> Result<Message> {
        let chat_id = self.confirm(ad_id).await?;
        let message = self
            .transport
            .send_message(&chat_id, &self.user_id, text)
            .await?;

        if let Err(e) = self.transport.mark_read(&chat_id).await {
            debug!("mark-read failed for chat {chat_id}: {e}");
        }

        Ok(message)
    }

    /// Send the current compose draft, clearing it on success only.
    pub async fn send_draft(&self) -> Result<Message> {
        let text = self.draft();
        let message = self.send(&text).await?;
        self.state.lock().unwrap().draft.clear();
        Ok(message)
    }

    /// Fallback display-name lookup for a counterpart. Failures degrade to
    /// `None`; this never blocks opening a chat.
    pub async fn counterpart_name(&self, user_id: &UserId) -> Option<String> {
        match self.transport.display_name(user_id).await {
            Ok(name) if !name.is_empty() => Some(name),
            Ok(_) => None,
            Err(e) => {
                debug!("display-name lookup failed for user {user_id}: {e}");
                None
            }
        }
    }

    /// Best-effort mark-read for the open conversation; failures are
    /// swallowed. Resets the local unread counter on success.
    pub async fn mark_open_read(&self) {
        let chat_id = match self.open_chat_id() {
            Some(id) => id,
            None => return,
        };

        if let Err(e) = self.transport.mark_read(&chat_id).await {
            debug!("mark-read failed for chat {chat_id}: {e}");
            return;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(conv) = state
            .conversations
            .iter_mut()
            .find(|c| c.chat_id() == Some(&chat_id))
        {
            conv.unread_count = 0;
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish()
    }
}
