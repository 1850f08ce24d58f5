//! HTTP client and configuration.

mod auth;
mod http;

pub use auth::AuthInfo;
pub use http::{HttpConfig, DEFAULT_BASE_URL};

use crate::api::{ChatApi, MessageApi, UserApi};
use crate::error::{Error, Result};
use http::{build_client, HttpExecutor};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating VyzioClient.
#[derive(Debug, Default)]
pub struct VyzioClientBuilder {
    auth: Option<AuthInfo>,
    http_config: HttpConfig,
}

impl VyzioClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set authentication.
    pub fn auth(mut self, token: impl Into<String>, uid: impl Into<String>) -> Self {
        self.auth = Some(AuthInfo::new(token, uid));
        self
    }

    /// Set authentication from AuthInfo.
    pub fn with_auth(mut self, auth: AuthInfo) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Set custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http_config.custom_user_agent = Some(ua.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Build VyzioClient.
    pub fn build(self) -> Result<VyzioClient> {
        let http_client = build_client(&self.http_config)?;

        Ok(VyzioClient {
            inner: Arc::new(VyzioClientInner {
                http: http_client,
                config: self.http_config,
                auth: self.auth,
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct VyzioClientInner {
    pub http: reqwest::Client,
    pub config: HttpConfig,
    pub auth: Option<AuthInfo>,
}

impl VyzioClientInner {
    /// Get auth info or error.
    pub fn require_auth(&self) -> Result<&AuthInfo> {
        self.auth.as_ref().ok_or(Error::AuthRequired)
    }

    /// Authorization header value, if a token is configured.
    pub fn bearer(&self) -> Option<String> {
        self.auth.as_ref().and_then(AuthInfo::bearer)
    }

    /// Create HTTP executor.
    pub fn executor(&self) -> HttpExecutor<'_> {
        HttpExecutor::new(&self.http, &self.config)
    }

    /// Execute a GET request with the configured credential.
    pub async fn get(&self, api: &str) -> Result<serde_json::Value> {
        self.executor().get_json(api, self.bearer()).await
    }

    /// Execute a JSON POST request with the configured credential.
    pub async fn post<B: serde::Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
    ) -> Result<serde_json::Value> {
        self.executor().post_json(api, body, self.bearer()).await
    }
}

/// Client for the Vyzio Ads marketplace API.
#[derive(Clone)]
pub struct VyzioClient {
    pub(crate) inner: Arc<VyzioClientInner>,
}

impl VyzioClient {
    /// Create a new client builder.
    pub fn builder() -> VyzioClientBuilder {
        VyzioClientBuilder::new()
    }

    /// Get the chat API.
    pub fn chats(&self) -> ChatApi {
        ChatApi::new(self.inner.clone())
    }

    /// Get the message API.
    pub fn messages(&self) -> MessageApi {
        MessageApi::new(self.inner.clone())
    }

    /// Get the user API.
    pub fn users(&self) -> UserApi {
        UserApi::new(self.inner.clone())
    }

    /// Check if the client is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.is_some()
    }

    /// Get the current authentication info.
    pub fn auth_info(&self) -> Option<&AuthInfo> {
        self.inner.auth.as_ref()
    }

    /// Get the current user ID if authenticated.
    pub fn current_uid(&self) -> Option<&str> {
        self.inner.auth.as_ref().map(|a| a.uid.as_str())
    }
}

impl std::fmt::Debug for VyzioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VyzioClient")
            .field("authenticated", &self.is_authenticated())
            .field("base_url", &self.inner.config.base_url)
            .finish()
    }
}
