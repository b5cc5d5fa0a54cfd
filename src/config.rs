//! Configuration management for monthlywrap.
//!
//! Configuration comes from environment variables, optionally seeded from
//! `.env` files. The lookup order is:
//! 1. Environment variables already set in the process (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/monthlywrap/.env`)
//! 4. Built-in defaults, where a sensible one exists
//!
//! Only the Spotify client id and secret have no default.

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_SCOPE: &str = "user-read-recently-played user-top-read";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Cannot prepare configuration directory: {0}")]
    Directory(String),
}

/// Settings of the OAuth/proxy backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Where `/callback` sends the browser once a session exists. `None`
    /// renders a small confirmation page instead.
    pub frontend_url: Option<String>,
}

impl Config {
    /// Builds the backend configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `SPOTIFY_CLIENT_ID` or
    /// `SPOTIFY_CLIENT_SECRET` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server_addr: var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: var_or("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: trim_slash(var_or("SPOTIFY_API_URL", DEFAULT_API_URL)),
            frontend_url: optional("FRONTEND_URL"),
        })
    }

    /// Configuration pointing every Spotify endpoint at `spotify_base`.
    ///
    /// Used to run the backend against a local stand-in for Spotify.
    pub fn for_spotify_base(spotify_base: &str, client_id: &str, client_secret: &str) -> Self {
        let base = spotify_base.trim_end_matches('/');
        Self {
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: format!("{base}/authorize"),
            token_url: format!("{base}/api/token"),
            api_url: format!("{base}/v1"),
            frontend_url: None,
        }
    }

    /// Session cookies are only marked `Secure` when the backend itself is
    /// reached over https.
    pub fn secure_cookies(&self) -> bool {
        self.redirect_uri.starts_with("https://")
    }
}

/// Loads `.env` files into the process environment.
///
/// Both files are optional. Variables that are already set are never
/// overwritten, so the working directory `.env` wins over the one in the
/// data directory.
pub async fn load_env() -> Result<(), ConfigError> {
    let _ = dotenv::dotenv();

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Directory(e.to_string()))?;
    }

    if path.is_file() {
        let _ = dotenv::from_path(&path);
    }
    Ok(())
}

/// Location of the user-level `.env` file.
pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("monthlywrap/.env");
    path
}

/// Backend URL the client talks to (`MONTHLYWRAP_BACKEND`).
pub fn backend_url() -> String {
    trim_slash(var_or("MONTHLYWRAP_BACKEND", DEFAULT_BACKEND_URL))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_base_derives_all_endpoints() {
        let config = Config::for_spotify_base("http://127.0.0.1:9999/", "id", "secret");
        assert_eq!(config.auth_url, "http://127.0.0.1:9999/authorize");
        assert_eq!(config.token_url, "http://127.0.0.1:9999/api/token");
        assert_eq!(config.api_url, "http://127.0.0.1:9999/v1");
        assert!(config.frontend_url.is_none());
    }

    #[test]
    fn cookies_are_secure_only_behind_https() {
        let mut config = Config::for_spotify_base("http://localhost", "id", "secret");
        assert!(!config.secure_cookies());

        config.redirect_uri = "https://monthlywrap.example/callback".to_string();
        assert!(config.secure_cookies());
    }

    #[test]
    fn missing_error_names_the_variable() {
        assert_eq!(
            ConfigError::Missing("SPOTIFY_CLIENT_ID").to_string(),
            "SPOTIFY_CLIENT_ID must be set"
        );
    }
}
