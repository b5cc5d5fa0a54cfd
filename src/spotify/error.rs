use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Spotify request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", auth_message(.error, .description))]
    Auth {
        error: String,
        description: Option<String>,
    },

    #[error("Spotify responded with status {0}")]
    Status(StatusCode),

    #[error("Invalid Spotify URL: {0}")]
    Url(String),
}

fn auth_message(error: &str, description: &Option<String>) -> String {
    description.clone().unwrap_or_else(|| error.to_string())
}
