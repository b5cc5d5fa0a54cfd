//! The wrap loader: session probe plus the fade cycle that reloads the wrap.
//!
//! A cycle walks `Idle → FadingOut → Fetching → FadingIn → Idle`, or ends in
//! `Error` when either request fails:
//!
//! 1. entry sets `is_reloading` and clears the previous error;
//! 2. after [`FadeTiming::fade_out`] both requests go out together;
//! 3. on success the display name is applied, and after
//!    [`FadeTiming::fade_in`] the tracks are swapped in and `is_reloading`
//!    cleared;
//! 4. on failure the error is recorded and `is_reloading` cleared at once,
//!    keeping the previous tracks.
//!
//! Each cycle carries the generation it started with. Starting a new cycle
//! bumps the generation, and a cycle whose generation is no longer current
//! stops touching the state: the last selected limit wins.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{
    client::Backend,
    types::Track,
    utils::{self, DEFAULT_LIMIT},
};

pub const FADE_OUT: Duration = Duration::from_millis(300);
pub const FADE_IN: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FadingOut,
    Fetching,
    FadingIn,
    Error,
}

/// Delays of the fade cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTiming {
    pub fade_out: Duration,
    pub fade_in: Duration,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            fade_out: FADE_OUT,
            fade_in: FADE_IN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New tracks were committed.
    Completed,
    /// A request failed; the error is in the state.
    Failed,
    /// A newer cycle started before this one finished.
    Superseded,
}

/// Everything the wrap view is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapState {
    pub display_name: String,
    pub tracks: Vec<Track>,
    pub limit: u8,
    pub error: Option<String>,
    pub is_reloading: bool,
    pub is_logged_in: bool,
    pub phase: Phase,
    generation: u64,
}

impl WrapState {
    pub fn new(limit: u8) -> Self {
        Self {
            display_name: String::new(),
            tracks: Vec::new(),
            limit: utils::clamp_limit(limit.into()),
            error: None,
            is_reloading: false,
            is_logged_in: false,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    /// Number of cycles started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the current cycle has come to rest.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Error) && !self.is_reloading
    }
}

impl Default for WrapState {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

/// Drives [`WrapState`] from a [`Backend`].
///
/// Cloning is cheap and every clone shares the same state, so cycles can be
/// spawned onto tasks while a renderer watches [`WrapLoader::subscribe`].
pub struct WrapLoader<B> {
    backend: Arc<B>,
    state: Arc<watch::Sender<WrapState>>,
    timing: FadeTiming,
}

impl<B> Clone for WrapLoader<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            timing: self.timing,
        }
    }
}

impl<B: Backend> WrapLoader<B> {
    pub fn new(backend: B, limit: u8) -> Self {
        Self::with_timing(backend, limit, FadeTiming::default())
    }

    pub fn with_timing(backend: B, limit: u8, timing: FadeTiming) -> Self {
        let (state, _) = watch::channel(WrapState::new(limit));
        Self {
            backend: Arc::new(backend),
            state: Arc::new(state),
            timing,
        }
    }

    pub fn snapshot(&self) -> WrapState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<WrapState> {
        self.state.subscribe()
    }

    /// Asks the backend whether the session is logged in.
    ///
    /// Failures are not surfaced; they only mark the state logged out.
    pub async fn probe_session(&self) -> bool {
        match self.backend.user_info().await {
            Ok(profile) => {
                self.state.send_modify(|s| {
                    s.display_name = profile.display_name;
                    s.is_logged_in = true;
                });
                true
            }
            Err(_) => {
                self.state.send_modify(|s| s.is_logged_in = false);
                false
            }
        }
    }

    /// Probes the session and, when logged in, loads the wrap for the
    /// current limit. Returns `None` when logged out.
    pub async fn mount(&self) -> Option<CycleOutcome> {
        if !self.probe_session().await {
            return None;
        }
        let limit = self.state.borrow().limit;
        Some(self.run_cycle(limit).await)
    }

    /// Selects a new limit (clamped to 1..=10) and reloads the wrap.
    pub async fn select_limit(&self, limit: u8) -> CycleOutcome {
        self.run_cycle(utils::clamp_limit(limit.into())).await
    }

    /// Starts a cycle for `limit` right away and returns the rest of it.
    ///
    /// The new cycle supersedes earlier ones before this returns, so cycles
    /// started in order win in that order no matter how the returned futures
    /// get scheduled.
    ///
    /// # Example
    ///
    /// ```
    /// let mut cycles = JoinSet::new();
    /// cycles.spawn(loader.reload(3));
    /// cycles.spawn(loader.reload(7)); // 7 wins
    /// ```
    pub fn reload(&self, limit: u8) -> impl Future<Output = CycleOutcome> + Send + use<B> {
        let limit = utils::clamp_limit(limit.into());
        let generation = self.begin_cycle(limit);
        let loader = self.clone();
        async move { loader.finish_cycle(generation, limit).await }
    }

    async fn run_cycle(&self, limit: u8) -> CycleOutcome {
        let generation = self.begin_cycle(limit);
        self.finish_cycle(generation, limit).await
    }

    /// Enters `FadingOut` under a new generation and returns it.
    fn begin_cycle(&self, limit: u8) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.limit = limit;
            s.error = None;
            s.is_reloading = true;
            s.phase = Phase::FadingOut;
        });
        generation
    }

    async fn finish_cycle(&self, generation: u64, limit: u8) -> CycleOutcome {
        tokio::time::sleep(self.timing.fade_out).await;
        if !self.advance(generation, |s| s.phase = Phase::Fetching) {
            return CycleOutcome::Superseded;
        }

        let fetched = tokio::try_join!(self.backend.user_info(), self.backend.top_tracks(limit));

        let (profile, tracks) = match fetched {
            Ok(data) => data,
            Err(e) => {
                let message = e.to_string();
                let current = self.advance(generation, |s| {
                    s.error = Some(message);
                    s.is_reloading = false;
                    s.phase = Phase::Error;
                });
                return if current {
                    CycleOutcome::Failed
                } else {
                    CycleOutcome::Superseded
                };
            }
        };

        if !self.advance(generation, |s| {
            s.display_name = profile.display_name;
            s.phase = Phase::FadingIn;
        }) {
            return CycleOutcome::Superseded;
        }

        tokio::time::sleep(self.timing.fade_in).await;
        if !self.advance(generation, |s| {
            s.tracks = tracks;
            s.is_reloading = false;
            s.phase = Phase::Idle;
        }) {
            return CycleOutcome::Superseded;
        }

        CycleOutcome::Completed
    }

    /// Applies `update` only while `generation` is still the current cycle.
    fn advance(&self, generation: u64, update: impl FnOnce(&mut WrapState)) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            update(s);
            true
        })
    }
}
