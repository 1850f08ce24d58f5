//! User handlers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use vyzio_chat::{Profile, VyzioClient};

use crate::output::{PlainPrint, TableRow};

/// User profile row.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRow {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub is_seller: bool,
    pub is_buyer: bool,
}

impl From<&Profile> for ProfileRow {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id.to_string(),
            username: p.username.clone(),
            display_name: p.display_name().to_string(),
            is_seller: p.is_seller,
            is_buyer: p.is_buyer,
        }
    }
}

impl TableRow for ProfileRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Username", "Name", "Seller", "Buyer"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.display_name.clone(),
            self.is_seller.to_string(),
            self.is_buyer.to_string(),
        ]
    }
}

impl PlainPrint for ProfileRow {
    fn plain_print(&self) {
        println!(
            "{} {}",
            format!("[UID: {}]", self.id).cyan(),
            self.display_name.bold()
        );
        let mut roles = Vec::new();
        if self.is_buyer {
            roles.push("buyer");
        }
        if self.is_seller {
            roles.push("seller");
        }
        println!(
            "   @{} {}",
            self.username.green(),
            roles.join(", ").dimmed()
        );
    }
}

/// Look up a user profile.
pub async fn show_user(client: &VyzioClient, uid: &str) -> Result<ProfileRow> {
    let profile = client.users().get(uid).await?;
    Ok(ProfileRow::from(&profile))
}
