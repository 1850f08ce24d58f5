//! User models and session role.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Which side of the marketplace the session user is on.
///
/// The role selects the conversation list endpoint and which name field of a
/// list entry refers to the counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Buyer,
    Seller,
}

impl Role {
    /// Placeholder display name for an unknown counterpart.
    pub fn counterpart_label(&self) -> &'static str {
        match self {
            Role::Buyer => "Seller",
            Role::Seller => "Buyer",
        }
    }

    /// Role name as used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A marketplace user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// User id.
    #[serde(default)]
    pub id: UserId,
    /// Account username.
    #[serde(default)]
    pub username: String,
    /// First name, preferred for display.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Whether the account can sell.
    #[serde(default)]
    pub is_seller: bool,
    /// Whether the account can buy.
    #[serde(default)]
    pub is_buyer: bool,
}

impl Profile {
    /// Name to show in a chat header: first name, falling back to username.
    pub fn display_name(&self) -> &str {
        if !self.first_name.is_empty() {
            &self.first_name
        } else {
            &self.username
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let p = Profile {
            username: "alice92".into(),
            first_name: "".into(),
            ..Default::default()
        };
        assert_eq!(p.display_name(), "alice92");

        let p = Profile {
            username: "alice92".into(),
            first_name: "Alice".into(),
            ..Default::default()
        };
        assert_eq!(p.display_name(), "Alice");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("buyer".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!("Seller".parse::<Role>().unwrap(), Role::Seller);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_counterpart_label() {
        assert_eq!(Role::Buyer.counterpart_label(), "Seller");
        assert_eq!(Role::Seller.counterpart_label(), "Buyer");
    }
}
