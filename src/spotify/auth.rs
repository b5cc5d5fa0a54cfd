use reqwest::{Client, Response, Url};

use crate::{
    config::Config,
    spotify::SpotifyError,
    types::{Token, TokenErrorResponse, TokenResponse},
    utils,
};

/// Builds the Spotify authorization URL the browser is redirected to by
/// `/login`.
///
/// The request asks for an authorization code, binds it to `state` and to
/// the PKCE challenge derived from the login's code verifier.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config, "Qx81...", &challenge)?;
/// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
/// ```
pub fn authorize_url(
    config: &Config,
    state: &str,
    code_challenge: &str,
) -> Result<String, SpotifyError> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("state", state),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
        ],
    )
    .map_err(|e| SpotifyError::Url(e.to_string()))?;

    Ok(url.into())
}

/// Exchanges an authorization code for a token.
///
/// Sends the client credentials together with the PKCE code verifier of the
/// pending login. Spotify error payloads (`{"error": ..,
/// "error_description": ..}`) come back as [`SpotifyError::Auth`].
pub async fn exchange_code(
    client: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, SpotifyError> {
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code_verifier", verifier),
        ])
        .send()
        .await?;

    let token = read_token_response(res).await?;
    let refresh_token = token.refresh_token.clone().unwrap_or_default();
    Ok(into_token(token, refresh_token))
}

/// Refreshes an access token.
///
/// Spotify does not always rotate the refresh token; when the response
/// carries none, the previous one is kept.
pub async fn refresh_token(
    client: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    let token = read_token_response(res).await?;
    let refresh = token
        .refresh_token
        .clone()
        .unwrap_or_else(|| refresh_token.to_string());
    Ok(into_token(token, refresh))
}

async fn read_token_response(res: Response) -> Result<TokenResponse, SpotifyError> {
    let status = res.status();
    let body = res.text().await?;

    if let Ok(err) = serde_json::from_str::<TokenErrorResponse>(&body) {
        return Err(SpotifyError::Auth {
            error: err.error,
            description: err.error_description,
        });
    }
    if !status.is_success() {
        return Err(SpotifyError::Status(status));
    }

    serde_json::from_str::<TokenResponse>(&body).map_err(|e| SpotifyError::Auth {
        error: "invalid_response".to_string(),
        description: Some(e.to_string()),
    })
}

fn into_token(token: TokenResponse, refresh_token: String) -> Token {
    Token {
        access_token: token.access_token,
        refresh_token,
        scope: token.scope.unwrap_or_default(),
        expires_in: token.expires_in,
        obtained_at: utils::now_timestamp(),
    }
}
