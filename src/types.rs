use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Spotify OAuth token held by a backend session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Whether the token is expired or will be within `margin` seconds of `now`.
    pub fn expires_within(&self, now: u64, margin: u64) -> bool {
        self.obtained_at.saturating_add(self.expires_in) < now.saturating_add(margin)
    }
}

/// Login started by `/login` and waiting for its `/callback`.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub code_verifier: String,
    pub created_at: u64,
}

/// Track as served by `/top-tracks` and rendered by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<String>,
    pub album_image: Option<String>,
}

/// Profile as served by `/user-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Missing or `null` both read as [`DEFAULT_DISPLAY_NAME`].
    #[serde(default = "default_display_name", deserialize_with = "display_name_or_default")]
    pub display_name: String,
}

pub const DEFAULT_DISPLAY_NAME: &str = "User";

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

fn display_name_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.unwrap_or_else(default_display_name))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyUser {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: Option<SpotifyAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Track {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album_image: track
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
        }
    }
}

#[derive(Tabled)]
pub struct CardTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub title: String,
    pub artists: String,
    #[tabled(rename = "album art")]
    pub album_art: String,
}
