//! Authentication state management.

/// Bearer credential for the marketplace API.
///
/// Absence of a token is tolerated by every endpoint; requests are then
/// attempted anonymously.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// Access token.
    pub token: String,
    /// User ID.
    pub uid: String,
}

impl AuthInfo {
    /// Create new auth info.
    pub fn new(token: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            uid: uid.into(),
        }
    }

    /// Check if auth looks usable: non-empty token and a positive numeric
    /// user id.
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && self.uid.parse::<u64>().map_or(false, |n| n > 0)
    }

    /// Value for the `Authorization` header, when a token is present.
    pub fn bearer(&self) -> Option<String> {
        if self.token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.token))
        }
    }
}
