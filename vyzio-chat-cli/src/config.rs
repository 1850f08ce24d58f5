//! Configuration management for the Vyzio CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use vyzio_chat::{Role, VyzioClient};

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Authentication credentials.
    pub auth: Option<AuthConfig>,
    /// API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer access token.
    pub token: String,
    /// User ID.
    pub uid: String,
    /// Marketplace role (buyer or seller).
    #[serde(default)]
    pub role: Role,
}

/// API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("vyzio.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Build a marketplace client from the current configuration.
pub fn build_client() -> Result<VyzioClient> {
    let config = load_config()?;

    let mut builder = VyzioClient::builder();

    if let Some(auth) = config.auth {
        builder = builder.auth(&auth.token, &auth.uid);
    }
    if let Some(base_url) = config.api.base_url {
        builder = builder.base_url(base_url);
    }

    builder.build().context("Failed to build client")
}

/// Build a client that requires authentication, returning the credentials
/// alongside it (the session engine needs the user id and role).
pub fn build_authed_client() -> Result<(VyzioClient, AuthConfig)> {
    let config = load_config()?;

    let auth = config
        .auth
        .context("Authentication required. Run 'vyzio auth login' first.")?;

    let mut builder = VyzioClient::builder().auth(&auth.token, &auth.uid);
    if let Some(base_url) = config.api.base_url {
        builder = builder.base_url(base_url);
    }

    let client = builder.build().context("Failed to build client")?;
    Ok((client, auth))
}
