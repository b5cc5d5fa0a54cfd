use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::session, error::ApiError, info, server::AppState, spotify, success, utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// `GET /login`: sends the browser to Spotify's consent page.
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    let (login_state, verifier) = state.sessions.begin_login().await;
    let challenge = utils::generate_code_challenge(&verifier);
    let url = spotify::auth::authorize_url(&state.config, &login_state, &challenge)?;

    info!("Redirecting to Spotify for authorization");
    Ok(Redirect::to(&url))
}

/// `GET /callback`: completes the authorization code flow and opens a session.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    if let Some(error) = params.error {
        warning!("Authorization denied: {}", error);
        return Err(ApiError::AuthorizationDenied(error));
    }

    let login_state = params.state.ok_or(ApiError::InvalidState)?;
    let pending = state
        .sessions
        .take_pending(&login_state)
        .await
        .ok_or(ApiError::InvalidState)?;
    let code = params.code.ok_or(ApiError::MissingCode)?;

    let token = spotify::auth::exchange_code(
        &state.http,
        &state.config,
        &code,
        &pending.code_verifier,
    )
    .await
    .map_err(|e| {
        warning!("Token exchange failed: {}", e);
        ApiError::TokenExchange(e)
    })?;

    let session_id = state.sessions.create(token).await;
    let cookie = session::session_cookie(&session_id, state.config.secure_cookies());
    success!("Session established");

    let response = match &state.config.frontend_url {
        Some(frontend) => ([(SET_COOKIE, cookie)], Redirect::to(frontend)).into_response(),
        None => (
            StatusCode::OK,
            [(SET_COOKIE, cookie)],
            Html(format!(
                "<h2>Authentication successful.</h2>\
                 <p>You can close this window, or run <code>monthlywrap wrap --session {session_id}</code>.</p>"
            )),
        )
            .into_response(),
    };
    Ok(response)
}

/// `GET /logout`: forgets the session and expires the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = session::session_id(&headers) {
        state.sessions.remove(&id).await;
    }
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, session::expired_session_cookie())],
    )
}
