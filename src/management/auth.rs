use reqwest::Client;

use crate::{
    config::Config,
    management::{SessionStore, SessionToken},
    spotify::{self, SpotifyError},
    utils,
};

/// Tokens expiring within this many seconds are refreshed before use.
pub const REFRESH_MARGIN: u64 = 60;

/// Token of one session, refreshed on demand.
///
/// The token lives behind the session's lock, so concurrent requests of the
/// same session refresh at most once: the first one refreshes while holding
/// the lock, the others find a fresh token once they get it.
pub struct TokenManager {
    token: SessionToken,
}

impl TokenManager {
    pub fn new(token: SessionToken) -> Self {
        TokenManager { token }
    }

    /// Loads the token of `session_id`, or `None` for unknown sessions.
    pub async fn load(store: &SessionStore, session_id: &str) -> Option<Self> {
        store.token(session_id).await.map(Self::new)
    }

    /// Returns an access token valid for at least [`REFRESH_MARGIN`] seconds.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client for the accounts service
    /// * `config` - Token URL and client credentials
    ///
    /// # Returns
    ///
    /// The access token, refreshed first when it is about to expire. The
    /// refreshed token replaces the session's token in place.
    ///
    /// # Errors
    ///
    /// The [`SpotifyError`] of a failed refresh; the stored token is left
    /// untouched.
    pub async fn get_valid_token(
        &self,
        client: &Client,
        config: &Config,
    ) -> Result<String, SpotifyError> {
        let mut token = self.token.lock().await;
        if token.expires_within(utils::now_timestamp(), REFRESH_MARGIN) {
            let refreshed =
                spotify::auth::refresh_token(client, config, &token.refresh_token).await?;
            *token = refreshed;
        }

        Ok(token.access_token.clone())
    }
}
