//! User commands.

use anyhow::Result;
use clap::Subcommand;

use crate::config::build_client;
use crate::handlers::user as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum UserAction {
    /// Show a user profile
    Show {
        /// User ID
        uid: String,
    },
}

pub async fn handle(action: UserAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        UserAction::Show { uid } => show_user(&uid, format).await,
    }
}

async fn show_user(uid: &str, format: OutputFormat) -> Result<()> {
    let client = build_client()?;
    let profile = handlers::show_user(&client, uid).await?;

    print_table(vec![profile], format);
    Ok(())
}
