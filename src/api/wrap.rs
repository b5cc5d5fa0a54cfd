use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    api::session,
    error::ApiError,
    server::AppState,
    spotify,
    types::Track,
    utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct TopTracksQuery {
    pub limit: Option<String>,
}

/// `GET /user-info`: display name of the session's user.
pub async fn user_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let token = session::access_token(&state, &headers).await?;
    let profile = spotify::user::current_user(&state.http, &state.config, &token)
        .await
        .inspect_err(|e| warning!("Fetching profile failed: {}", e))?;

    Ok(Json(json!({ "display_name": profile.display_name })))
}

/// `GET /top-tracks?limit=N`: the session user's short-term top tracks.
///
/// `limit` defaults to 5 and is clamped to 1..=10.
pub async fn top_tracks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<TopTracksQuery>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let token = session::access_token(&state, &headers).await?;
    let limit = utils::parse_limit(params.limit.as_deref());

    let tracks = spotify::user::top_tracks(&state.http, &state.config, &token, limit)
        .await
        .inspect_err(|e| warning!("Fetching top tracks failed: {}", e))?;

    Ok(Json(tracks))
}
