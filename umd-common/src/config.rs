//! Configuration loading and server connection resolution
//!
//! Connection settings resolve per-field in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default backend API root (the development server address)
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8010/api/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "UMD_SERVER_URL";

/// Environment variable providing the authentication token
pub const API_TOKEN_ENV: &str = "UMD_API_TOKEN";

/// Resolved client connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root, without trailing slash
    pub server_url: String,
    /// Girder authentication token, if any (anonymous otherwise)
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// On-disk config file shape (`~/.config/umd-client/config.toml`)
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    server_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Resolve connection settings from CLI arguments, environment,
    /// config file and defaults, in that priority order per field.
    pub fn resolve(cli_url: Option<&str>, cli_token: Option<&str>) -> Result<Self> {
        let file = match config_file_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                load_config_file(&path)?
            }
            _ => ConfigFile::default(),
        };

        Ok(merge(
            cli_url,
            cli_token,
            std::env::var(SERVER_URL_ENV).ok(),
            std::env::var(API_TOKEN_ENV).ok(),
            file,
        ))
    }
}

/// Merge the four configuration tiers into a resolved config
fn merge(
    cli_url: Option<&str>,
    cli_token: Option<&str>,
    env_url: Option<String>,
    env_token: Option<String>,
    file: ConfigFile,
) -> ClientConfig {
    let server_url = cli_url
        .map(str::to_string)
        .or(env_url)
        .or(file.server_url)
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let api_token = cli_token.map(str::to_string).or(env_token).or(file.api_token);

    ClientConfig {
        server_url: server_url.trim_end_matches('/').to_string(),
        api_token,
        timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    }
}

/// Config file path for the platform (`<config_dir>/umd-client/config.toml`)
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("umd-client").join("config.toml"))
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}
