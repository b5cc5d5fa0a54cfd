use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::spotify::SpotifyError;

/// Errors returned by the HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Error: {0}")]
    AuthorizationDenied(String),

    #[error("Missing authorization code")]
    MissingCode,

    #[error("Unknown or expired login state")]
    InvalidState,

    #[error("Error fetching token: {0}")]
    TokenExchange(SpotifyError),

    #[error(transparent)]
    Upstream(#[from] SpotifyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::AuthorizationDenied(_) | ApiError::MissingCode | ApiError::InvalidState => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TokenExchange(_) | ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Browser-facing: the user lands here straight from Spotify.
            ApiError::AuthorizationDenied(_)
            | ApiError::MissingCode
            | ApiError::InvalidState
            | ApiError::TokenExchange(_) => (status, self.to_string()).into_response(),
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}
