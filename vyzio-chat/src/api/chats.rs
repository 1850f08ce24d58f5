//! Chat API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    client::VyzioClientInner,
    error::{Error, Result},
    models::{AdId, ChatHandle, ChatId, Conversation, Role, UserId},
};

/// API for conversation operations.
pub struct ChatApi {
    client: Arc<VyzioClientInner>,
}

impl ChatApi {
    pub(crate) fn new(client: Arc<VyzioClientInner>) -> Self {
        Self { client }
    }

    /// List conversations for a user, newest first as returned by the server.
    pub async fn list(&self, user_id: &UserId, role: Role) -> Result<Vec<Conversation>> {
        let api = format!("api/{}/{}/chats/", role.as_str(), user_id);
        let value = self.client.get(&api).await?;

        let items: Vec<ChatSummaryDto> = serde_json::from_value(value)?;
        Ok(items.into_iter().map(|dto| dto.into_conversation(role)).collect())
    }

    /// Create or fetch the conversation for a (buyer, seller, ad) triple.
    ///
    /// Returns the confirmed conversation record, with the counterpart
    /// selected by the session role. The server reports the identifier under
    /// either `id` or `chat_id`; both are accepted.
    pub async fn create(
        &self,
        buyer_id: &UserId,
        seller_id: &UserId,
        ad_id: &AdId,
        role: Role,
    ) -> Result<Conversation> {
        let body = json!({
            "buyer_id": buyer_id.as_str(),
            "seller_id": seller_id.as_str(),
            "ad_id": ad_id.as_str(),
        });

        let value = self.client.post("api/chats/create/", &body).await?;
        let dto: CreateChatDto = serde_json::from_value(value)?;

        if dto.id == 0 {
            return Err(Error::missing("id"));
        }
        Ok(dto.into_conversation(ad_id, role))
    }

    /// Mark all counterpart messages in a conversation as read.
    pub async fn mark_read(&self, chat_id: &ChatId) -> Result<()> {
        let api = format!("api/chats/{chat_id}/mark-read/");
        self.client.post(&api, &json!({})).await?;
        Ok(())
    }
}

/// One entry of the buyer/seller chat list response.
#[derive(Debug, Deserialize)]
struct ChatSummaryDto {
    chat_id: i64,
    ad_id: i64,
    #[serde(default)]
    ad_title: String,
    #[serde(default)]
    seller_name: Option<String>,
    #[serde(default)]
    buyer_name: Option<String>,
    #[serde(default)]
    last_message: Option<String>,
    #[serde(default)]
    last_message_time: Option<DateTime<Utc>>,
    #[serde(default)]
    unread_count: u32,
}

impl ChatSummaryDto {
    fn into_conversation(self, role: Role) -> Conversation {
        let counterpart_name = match role {
            Role::Buyer => self.seller_name,
            Role::Seller => self.buyer_name,
        }
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| role.counterpart_label().to_owned());

        Conversation {
            ad_id: self.ad_id.into(),
            ad_title: self.ad_title,
            handle: ChatHandle::Confirmed(self.chat_id.into()),
            counterpart_id: None,
            counterpart_name,
            last_message: self.last_message.unwrap_or_default(),
            last_message_time: self.last_message_time,
            unread_count: self.unread_count,
        }
    }
}

/// Response of the create-or-fetch endpoint.
#[derive(Debug, Deserialize)]
struct CreateChatDto {
    #[serde(alias = "chat_id", default)]
    id: i64,
    #[serde(alias = "ad_id", default)]
    ad: i64,
    #[serde(default)]
    ad_title: Option<String>,
    #[serde(default)]
    buyer: Option<i64>,
    #[serde(default)]
    seller: Option<i64>,
    #[serde(default)]
    buyer_name: Option<String>,
    #[serde(default)]
    seller_name: Option<String>,
    #[serde(default)]
    last_message: Option<String>,
    #[serde(default)]
    unread_count: u32,
}

impl CreateChatDto {
    fn into_conversation(self, requested_ad: &AdId, role: Role) -> Conversation {
        let ad_id = if self.ad != 0 {
            AdId::from(self.ad)
        } else {
            requested_ad.clone()
        };

        // The counterpart is the other side of the triple.
        let (counterpart_id, counterpart_name) = match role {
            Role::Buyer => (self.seller, self.seller_name),
            Role::Seller => (self.buyer, self.buyer_name),
        };

        Conversation {
            ad_id,
            ad_title: self.ad_title.unwrap_or_default(),
            handle: ChatHandle::Confirmed(self.id.into()),
            counterpart_id: counterpart_id.map(UserId::from),
            counterpart_name: counterpart_name.unwrap_or_default(),
            last_message: self.last_message.unwrap_or_default(),
            last_message_time: None,
            unread_count: self.unread_count,
        }
    }
}
