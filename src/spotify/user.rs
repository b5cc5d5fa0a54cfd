use reqwest::Client;

use crate::{
    config::Config,
    spotify::SpotifyError,
    types::{DEFAULT_DISPLAY_NAME, SpotifyUser, TopTracksResponse, Track, UserProfile},
};

/// Short-term (roughly the last four weeks) is what makes it a monthly wrap.
pub const TOP_TRACKS_TIME_RANGE: &str = "short_term";

/// Fetches the profile of the token's owner (`GET /me`).
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `config` - Provides the Web API base URL
/// * `access_token` - Valid access token of the session
///
/// # Returns
///
/// The user's profile. A missing or null `display_name` becomes `"User"`.
///
/// # Errors
///
/// [`SpotifyError::Http`] for transport failures and non-2xx answers.
pub async fn current_user(
    client: &Client,
    config: &Config,
    access_token: &str,
) -> Result<UserProfile, SpotifyError> {
    let user = client
        .get(format!("{}/me", config.api_url))
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<SpotifyUser>()
        .await?;

    Ok(UserProfile {
        display_name: user
            .display_name
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
    })
}

/// Fetches the user's short-term top tracks (`GET /me/top/tracks`).
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `config` - Provides the Web API base URL
/// * `access_token` - Valid access token of the session
/// * `limit` - Number of tracks, passed through as is; callers clamp it first
///
/// # Returns
///
/// The tracks in Spotify's order, each reduced to name, artist names and the
/// first album image.
///
/// # Example
///
/// ```
/// let tracks = top_tracks(&client, &config, &token, 5).await?;
/// println!("#1 this month: {}", tracks[0].name);
/// ```
pub async fn top_tracks(
    client: &Client,
    config: &Config,
    access_token: &str,
    limit: u8,
) -> Result<Vec<Track>, SpotifyError> {
    let res = client
        .get(format!("{}/me/top/tracks", config.api_url))
        .query(&[
            ("time_range", TOP_TRACKS_TIME_RANGE.to_string()),
            ("limit", limit.to_string()),
        ])
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<TopTracksResponse>()
        .await?;

    Ok(res.items.into_iter().map(Track::from).collect())
}
