use axum::http::{HeaderMap, header::COOKIE};

use crate::{
    error::ApiError,
    management::{SESSION_COOKIE, TokenManager},
    server::AppState,
    spotify::SpotifyError,
    utils, warning,
};

pub(crate) fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| utils::cookie_value(header, SESSION_COOKIE))
        .map(str::to_string)
}

pub(crate) fn session_cookie(id: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Access token for the request's session.
///
/// A missing session, an unknown session and a failed refresh all read as
/// "not authenticated". A session whose refresh token Spotify rejected is
/// dropped.
pub(crate) async fn access_token(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<String, ApiError> {
    let id = session_id(headers).ok_or(ApiError::NotAuthenticated)?;
    let manager = TokenManager::load(&state.sessions, &id)
        .await
        .ok_or(ApiError::NotAuthenticated)?;

    match manager.get_valid_token(&state.http, &state.config).await {
        Ok(token) => Ok(token),
        Err(e) => {
            warning!("Token refresh failed: {}", e);
            if matches!(e, SpotifyError::Auth { .. }) {
                state.sessions.remove(&id).await;
            }
            Err(ApiError::NotAuthenticated)
        }
    }
}
