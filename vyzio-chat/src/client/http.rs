//! HTTP client configuration and request execution.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Default marketplace API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vyzio.com/";

/// Default user agent.
pub const DEFAULT_USER_AGENT: &str =
    concat!("vyzio-chat/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for API requests.
    pub base_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// Custom user agent.
    pub custom_user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
            custom_user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Get the user agent to send.
    pub fn user_agent(&self) -> &str {
        self.custom_user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolve a relative API path to a full URL.
    pub fn resolve_url(&self, api: &str) -> Result<Url> {
        if api.starts_with("http://") || api.starts_with("https://") {
            return Url::parse(api).map_err(Error::Url);
        }

        Url::parse(&self.base_url)
            .and_then(|b| b.join(api))
            .map_err(Error::Url)
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .gzip(true)
        .build()
        .map_err(Error::Network)
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor.
    pub fn new(client: &'a Client, config: &'a HttpConfig) -> Self {
        Self { client, config }
    }

    /// Build a request with common headers.
    ///
    /// A missing credential does not block the request; it is simply sent
    /// anonymously.
    fn build_request(&self, method: Method, url: Url, bearer: Option<String>) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("User-Agent", self.config.user_agent())
            .header("Accept", "application/json");

        if let Some(header) = bearer {
            request = request.header("Authorization", header);
        }

        request
    }

    /// Execute a GET request and parse the JSON response.
    pub async fn get_json(&self, api: &str, bearer: Option<String>) -> Result<serde_json::Value> {
        let url = self.config.resolve_url(api)?;
        let response = self
            .build_request(Method::GET, url, bearer)
            .send()
            .await
            .map_err(Error::Network)?;

        handle_json_response(response).await
    }

    /// Execute a POST request with a JSON body and parse the JSON response.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        api: &str,
        body: &B,
        bearer: Option<String>,
    ) -> Result<serde_json::Value> {
        let url = self.config.resolve_url(api)?;
        let response = self
            .build_request(Method::POST, url, bearer)
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;

        handle_json_response(response).await
    }
}

/// Turn a response into JSON, mapping non-2xx statuses to API errors.
async fn handle_json_response(response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    let text = response.text().await.map_err(Error::Network)?;

    if !status.is_success() {
        return Err(Error::api(status.as_u16(), extract_api_message(status, &text)));
    }

    if text.is_empty() {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(&text).map_err(Error::Json)
}

/// Pull a human-readable message out of an error body.
fn extract_api_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_owned();
            }
        }
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let config = HttpConfig::default();

        let url = config.resolve_url("api/chats/create/").unwrap();
        assert!(url.as_str().contains("api.vyzio.com"));
        assert!(url.as_str().ends_with("api/chats/create/"));
    }

    #[test]
    fn test_resolve_absolute_url() {
        let config = HttpConfig::default();
        let url = config.resolve_url("https://staging.vyzio.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://staging.vyzio.com/api/");
    }

    #[test]
    fn test_extract_api_message() {
        let msg = extract_api_message(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Sender must be buyer or seller in this chat."}"#,
        );
        assert_eq!(msg, "Sender must be buyer or seller in this chat.");

        let msg = extract_api_message(StatusCode::NOT_FOUND, "not json");
        assert_eq!(msg, "Not Found");
    }
}
