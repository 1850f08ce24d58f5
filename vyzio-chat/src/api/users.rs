//! User API.

use std::sync::Arc;

use crate::{
    client::VyzioClientInner,
    error::Result,
    models::{Profile, UserId},
};

/// API for user operations.
pub struct UserApi {
    client: Arc<VyzioClientInner>,
}

impl UserApi {
    pub(crate) fn new(client: Arc<VyzioClientInner>) -> Self {
        Self { client }
    }

    /// Get a user profile by ID.
    pub async fn get(&self, user_id: impl Into<UserId>) -> Result<Profile> {
        let user_id = user_id.into();
        let api = format!("api/users/{user_id}/");
        let value = self.client.get(&api).await?;

        let mut profile: Profile = serde_json::from_value(value)?;
        if profile.id.is_empty() {
            profile.id = user_id;
        }
        Ok(profile)
    }

    /// Fallback display-name lookup for a counterpart.
    pub async fn display_name(&self, user_id: &UserId) -> Result<String> {
        let profile = self.get(user_id.clone()).await?;
        Ok(profile.display_name().to_owned())
    }

    /// Get the current authenticated user.
    pub async fn me(&self) -> Result<Profile> {
        let auth = self.client.require_auth()?;
        let uid = UserId::new(&auth.uid);
        self.get(uid).await
    }
}
