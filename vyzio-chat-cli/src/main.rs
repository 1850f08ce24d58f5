//! Vyzio marketplace chat CLI.

mod commands;
mod config;
mod handlers;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{chat, user};
use vyzio_chat::Role;

/// Vyzio marketplace chat CLI
#[derive(Parser)]
#[command(name = "vyzio")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Chat operations
    #[command(alias = "c")]
    Chat {
        #[command(subcommand)]
        action: chat::ChatAction,
    },

    /// User operations
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        action: user::UserAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Login with token and uid
    Login {
        /// Access token
        #[arg(short, long)]
        token: String,
        /// User ID
        #[arg(short, long)]
        uid: String,
        /// Marketplace role (buyer or seller)
        #[arg(short, long, default_value = "buyer")]
        role: Role,
    },
    /// Logout
    Logout,
    /// Show current auth status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Auth { action } => handle_auth(action).await,
        Commands::Chat { action } => chat::handle(action, cli.format, cli.verbose).await,
        Commands::User { action } => user::handle(action, cli.format, cli.verbose).await,
        Commands::Config => {
            let cfg = config::load_config()?;
            println!("Config file: {}", config::config_path()?.display());
            println!("Authenticated: {}", cfg.auth.is_some());
            if let Some(auth) = &cfg.auth {
                println!("User ID: {}", auth.uid);
                println!("Role: {}", auth.role);
            }
            if let Some(base_url) = &cfg.api.base_url {
                println!("Base URL: {base_url}");
            }
            Ok(())
        }
    }
}

async fn handle_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login { token, uid, role } => {
            let mut cfg = config::load_config()?;
            cfg.auth = Some(config::AuthConfig {
                token,
                uid: uid.clone(),
                role,
            });
            config::save_config(&cfg)?;
            println!("Logged in as {uid} ({role})");
            Ok(())
        }
        AuthAction::Logout => {
            let mut cfg = config::load_config()?;
            cfg.auth = None;
            config::save_config(&cfg)?;
            println!("Logged out");
            Ok(())
        }
        AuthAction::Status => {
            let cfg = config::load_config()?;
            if let Some(auth) = &cfg.auth {
                println!("Logged in as {} ({})", auth.uid, auth.role);
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
    }
}
