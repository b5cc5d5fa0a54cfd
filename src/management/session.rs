use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    types::{PendingLogin, Token},
    utils,
};

pub const SESSION_COOKIE: &str = "monthlywrap_session";

/// Logins that never came back from Spotify are dropped after this many seconds.
pub const PENDING_LOGIN_TTL: u64 = 600;

/// Sessions unused for this many seconds (30 days) are dropped.
pub const SESSION_IDLE_TTL: u64 = 60 * 60 * 24 * 30;

/// Token of one session. Holding its lock is what serializes refreshes.
pub type SessionToken = Arc<Mutex<Token>>;

#[derive(Debug)]
struct SessionEntry {
    token: SessionToken,
    last_seen: u64,
}

/// In-memory session storage.
///
/// Maps session ids (the cookie value) to the Spotify token of that browser,
/// and OAuth `state` values to logins still waiting for their callback.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    pending: Mutex<HashMap<String, PendingLogin>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a login.
    ///
    /// Generates a fresh OAuth `state` and PKCE code verifier and remembers
    /// the verifier under the state until the callback comes back. Logins
    /// older than [`PENDING_LOGIN_TTL`] are pruned on the way.
    ///
    /// # Returns
    ///
    /// `(state, code_verifier)`: the state goes into the authorize URL, the
    /// verifier is turned into the PKCE challenge.
    ///
    /// # Example
    ///
    /// ```
    /// let (state, verifier) = store.begin_login().await;
    /// let challenge = utils::generate_code_challenge(&verifier);
    /// ```
    pub async fn begin_login(&self) -> (String, String) {
        let state = utils::generate_state();
        let code_verifier = utils::generate_code_verifier();
        let now = utils::now_timestamp();

        let mut pending = self.pending.lock().await;
        pending.retain(|_, login| now.saturating_sub(login.created_at) < PENDING_LOGIN_TTL);
        pending.insert(
            state.clone(),
            PendingLogin {
                code_verifier: code_verifier.clone(),
                created_at: now,
            },
        );

        (state, code_verifier)
    }

    /// Removes and returns the pending login for `state`, if it has not expired.
    pub async fn take_pending(&self, state: &str) -> Option<PendingLogin> {
        let login = self.pending.lock().await.remove(state)?;
        let age = utils::now_timestamp().saturating_sub(login.created_at);
        (age < PENDING_LOGIN_TTL).then_some(login)
    }

    /// Opens a session.
    ///
    /// # Arguments
    ///
    /// * `token` - Token returned by the code exchange
    ///
    /// # Returns
    ///
    /// The new session id, used as the `monthlywrap_session` cookie value.
    /// Sessions idle for longer than [`SESSION_IDLE_TTL`] are evicted first.
    pub async fn create(&self, token: Token) -> String {
        let id = utils::generate_session_id();
        let now = utils::now_timestamp();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, entry| now.saturating_sub(entry.last_seen) < SESSION_IDLE_TTL);
        sessions.insert(
            id.clone(),
            SessionEntry {
                token: Arc::new(Mutex::new(token)),
                last_seen: now,
            },
        );
        id
    }

    /// Shared token handle of a session; marks the session as used.
    pub async fn token(&self, id: &str) -> Option<SessionToken> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = utils::now_timestamp();
        Some(Arc::clone(&entry.token))
    }

    /// Copy of a session's current token.
    pub async fn get(&self, id: &str) -> Option<Token> {
        let token = self.token(id).await?;
        let token = token.lock().await.clone();
        Some(token)
    }

    /// Replaces the token of an existing session. Unknown ids are ignored.
    pub async fn update(&self, id: &str, token: Token) {
        if let Some(existing) = self.token(id).await {
            *existing.lock().await = token;
        }
    }

    pub async fn remove(&self, id: &str) -> Option<Token> {
        let entry = self.sessions.lock().await.remove(id)?;
        let token = entry.token.lock().await.clone();
        Some(token)
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
