use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use monthlywrap::client::{
    Backend, ClientError, CycleOutcome, Phase, View, WrapLoader, WrapState, render,
};
use monthlywrap::types::{Track, UserProfile};
use reqwest::StatusCode;
use tokio::time::sleep;

const BACKEND: &str = "http://backend.test";

#[derive(Default)]
struct FakeState {
    display_name: Option<String>,
    catalog: Vec<Track>,
    tracks_status: Option<StatusCode>,
    failing_limits: HashSet<u8>,
    delays: HashMap<u8, Duration>,
    top_tracks_calls: Vec<u8>,
}

/// Backend whose answers the test can change between cycles.
#[derive(Clone, Default)]
struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    fn logged_in(name: &str, track_count: usize) -> Self {
        let backend = Self::default();
        {
            let mut s = backend.state.lock().unwrap();
            s.display_name = Some(name.to_string());
            s.catalog = (1..=track_count).map(create_test_track).collect();
        }
        backend
    }

    fn logged_out() -> Self {
        Self::default()
    }

    fn set_tracks_status(&self, status: Option<StatusCode>) {
        self.state.lock().unwrap().tracks_status = status;
    }

    fn fail_limit(&self, limit: u8) {
        self.state.lock().unwrap().failing_limits.insert(limit);
    }

    fn delay_limit(&self, limit: u8, delay: Duration) {
        self.state.lock().unwrap().delays.insert(limit, delay);
    }

    fn set_display_name(&self, name: Option<&str>) {
        self.state.lock().unwrap().display_name = name.map(str::to_string);
    }

    fn top_tracks_calls(&self) -> Vec<u8> {
        self.state.lock().unwrap().top_tracks_calls.clone()
    }
}

impl Backend for FakeBackend {
    fn user_info(&self) -> impl Future<Output = Result<UserProfile, ClientError>> + Send {
        let result = match &self.state.lock().unwrap().display_name {
            Some(name) => Ok(UserProfile {
                display_name: name.clone(),
            }),
            None => Err(ClientError::Status(StatusCode::UNAUTHORIZED)),
        };
        async move { result }
    }

    fn top_tracks(&self, limit: u8) -> impl Future<Output = Result<Vec<Track>, ClientError>> + Send {
        let mut s = self.state.lock().unwrap();
        s.top_tracks_calls.push(limit);

        let delay = s.delays.get(&limit).copied();
        let result = if s.failing_limits.contains(&limit) {
            Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        } else if let Some(status) = s.tracks_status {
            Err(ClientError::Status(status))
        } else {
            Ok(s.catalog.iter().take(limit as usize).cloned().collect())
        };

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            result
        }
    }
}

fn create_test_track(i: usize) -> Track {
    Track {
        name: format!("Track {i}"),
        artists: vec![format!("Artist {i}"), "Guest".to_string()],
        album_image: Some(format!("https://img.example/{i}.jpg")),
    }
}

fn track_names(state: &WrapState) -> Vec<String> {
    state.tracks.iter().map(|t| t.name.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_mount_without_session_shows_login() {
    let loader = WrapLoader::new(FakeBackend::logged_out(), 5);

    assert_eq!(loader.mount().await, None);

    let state = loader.snapshot();
    assert!(!state.is_logged_in);
    assert!(state.error.is_none(), "probe failures are not surfaced");
    assert!(state.tracks.is_empty());

    match render(&state, BACKEND) {
        View::LoginPrompt { login_url } => assert_eq!(login_url, "http://backend.test/login"),
        other => panic!("expected login prompt, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_mount_with_session_renders_cards() {
    let loader = WrapLoader::new(FakeBackend::logged_in("Ada", 10), 5);

    assert_eq!(loader.mount().await, Some(CycleOutcome::Completed));

    let state = loader.snapshot();
    assert!(state.is_logged_in);
    assert!(!state.is_reloading);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.display_name, "Ada");

    let view = render(&state, BACKEND);
    assert_eq!(view.card_count(), 5);
    let View::Wrap(wrap) = view else {
        panic!("expected the wrap view");
    };
    assert_eq!(wrap.greeting, "Welcome, Ada!");
    assert_eq!(wrap.limit, 5);
    let monthlywrap::client::WrapBody::Cards(cards) = wrap.body else {
        panic!("expected cards");
    };
    assert_eq!(cards[0].title, "Track 1");
    assert_eq!(cards[0].artists, "Artist 1, Guest");
    assert_eq!(cards[0].image_url.as_deref(), Some("https://img.example/1.jpg"));
    assert_eq!(cards[4].title, "Track 5");
}

#[tokio::test(start_paused = true)]
async fn test_card_count_matches_returned_tracks_for_every_limit() {
    // Fewer tracks than the largest limit
    let loader = WrapLoader::new(FakeBackend::logged_in("Ada", 7), 1);
    loader.mount().await;

    for limit in 1..=10u8 {
        assert_eq!(loader.select_limit(limit).await, CycleOutcome::Completed);
        let state = loader.snapshot();
        assert_eq!(state.limit, limit);
        assert_eq!(render(&state, BACKEND).card_count(), state.tracks.len());
        assert_eq!(state.tracks.len(), usize::from(limit).min(7));
    }
}

#[tokio::test(start_paused = true)]
async fn test_fade_cycle_timeline() {
    let loader = WrapLoader::new(FakeBackend::logged_in("Ada", 10), 5);
    loader.mount().await;
    let before = track_names(&loader.snapshot());

    let cycle = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.select_limit(3).await })
    };

    // Fade-out: reloading, old cards still in place
    sleep(Duration::from_millis(10)).await;
    let state = loader.snapshot();
    assert!(state.is_reloading);
    assert_eq!(state.phase, Phase::FadingOut);
    assert_eq!(state.limit, 3);
    assert_eq!(track_names(&state), before);

    // Data arrived at 300ms, tracks are held back for the fade-in
    sleep(Duration::from_millis(300)).await;
    let state = loader.snapshot();
    assert!(state.is_reloading);
    assert_eq!(state.phase, Phase::FadingIn);
    assert_eq!(track_names(&state), before);

    // Committed at 400ms
    sleep(Duration::from_millis(100)).await;
    let state = loader.snapshot();
    assert!(!state.is_reloading);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(track_names(&state), vec!["Track 1", "Track 2", "Track 3"]);

    assert_eq!(cycle.await.unwrap(), CycleOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_reloading_flips_once_per_cycle() {
    let loader = WrapLoader::new(FakeBackend::logged_in("Ada", 10), 5);
    let mut rx = loader.subscribe();

    let observer = tokio::spawn(async move {
        let mut flips = 0;
        let mut reloading = false;
        while rx.changed().await.is_ok() {
            let now = rx.borrow_and_update().is_reloading;
            if reloading && !now {
                flips += 1;
            }
            reloading = now;
        }
        flips
    });

    loader.mount().await;
    for limit in [3, 8, 1] {
        sleep(Duration::from_millis(1)).await;
        assert_eq!(loader.select_limit(limit).await, CycleOutcome::Completed);
    }
    sleep(Duration::from_millis(1)).await;

    drop(loader);
    assert_eq!(observer.await.unwrap(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_top_tracks_failure_keeps_previous_tracks() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 5);
    loader.mount().await;
    let before = track_names(&loader.snapshot());

    backend.set_tracks_status(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let cycle = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.select_limit(3).await })
    };

    // The error lands right after the fetch, without waiting for a fade-in
    sleep(Duration::from_millis(310)).await;
    let state = loader.snapshot();
    assert!(!state.is_reloading);
    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.error.as_deref(), Some("HTTP error! status: 500"));
    assert_eq!(track_names(&state), before);

    assert_eq!(cycle.await.unwrap(), CycleOutcome::Failed);

    // The error is shown inline next to the old cards
    let View::Wrap(wrap) = render(&state, BACKEND) else {
        panic!("expected the wrap view");
    };
    assert_eq!(wrap.error.as_deref(), Some("HTTP error! status: 500"));
    assert_eq!(render(&state, BACKEND).card_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_profile_failure_fails_the_cycle() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 5);
    loader.mount().await;

    backend.set_display_name(None);
    assert_eq!(loader.select_limit(2).await, CycleOutcome::Failed);

    let state = loader.snapshot();
    assert_eq!(state.error.as_deref(), Some("HTTP error! status: 401"));
    assert_eq!(state.tracks.len(), 5);
    // Still rendered as logged in: only the probe decides that
    assert!(state.is_logged_in);
}

#[tokio::test(start_paused = true)]
async fn test_next_cycle_clears_error() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 5);
    loader.mount().await;

    backend.set_tracks_status(Some(StatusCode::BAD_GATEWAY));
    assert_eq!(loader.select_limit(4).await, CycleOutcome::Failed);
    assert!(loader.snapshot().error.is_some());

    backend.set_tracks_status(None);
    assert_eq!(loader.select_limit(4).await, CycleOutcome::Completed);

    let state = loader.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.tracks.len(), 4);
    assert_eq!(state.phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_newer_cycle_wins_over_slow_older_one() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 2);
    loader.mount().await;

    backend.delay_limit(5, Duration::from_millis(500));
    let slow = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.select_limit(5).await })
    };

    // The slow cycle is waiting on the network when the user picks 3
    sleep(Duration::from_millis(350)).await;
    let fast = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.select_limit(3).await })
    };

    assert_eq!(fast.await.unwrap(), CycleOutcome::Completed);
    assert_eq!(slow.await.unwrap(), CycleOutcome::Superseded);

    let state = loader.snapshot();
    assert_eq!(state.limit, 3);
    assert_eq!(state.tracks.len(), 3);
    assert!(!state.is_reloading);
    assert_eq!(state.phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_does_not_resurrect_error() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 2);
    loader.mount().await;

    backend.fail_limit(5);
    backend.delay_limit(5, Duration::from_millis(500));
    let slow = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.select_limit(5).await })
    };

    sleep(Duration::from_millis(350)).await;
    assert_eq!(loader.select_limit(3).await, CycleOutcome::Completed);
    assert_eq!(slow.await.unwrap(), CycleOutcome::Superseded);

    let state = loader.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.tracks.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cycle_superseded_during_fade_out_never_fetches() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 2);
    loader.mount().await;

    let first = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.select_limit(6).await })
    };
    sleep(Duration::from_millis(100)).await;
    assert_eq!(loader.select_limit(4).await, CycleOutcome::Completed);
    assert_eq!(first.await.unwrap(), CycleOutcome::Superseded);

    // Only the mount (2) and the winning cycle (4) reached the network
    assert_eq!(backend.top_tracks_calls(), vec![2, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_limits_are_clamped() {
    let loader = WrapLoader::new(FakeBackend::logged_in("Ada", 10), 0);
    assert_eq!(loader.snapshot().limit, 1);

    loader.mount().await;
    loader.select_limit(42).await;
    let state = loader.snapshot();
    assert_eq!(state.limit, 10);
    assert_eq!(state.tracks.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_generation_counts_started_cycles() {
    let loader = WrapLoader::new(FakeBackend::logged_in("Ada", 10), 5);
    assert_eq!(loader.snapshot().generation(), 0);

    loader.mount().await;
    loader.select_limit(2).await;
    let state = loader.snapshot();
    assert_eq!(state.generation(), 2);
    assert!(state.is_settled());
}

#[tokio::test(start_paused = true)]
async fn test_reload_order_is_fixed_when_started() {
    let backend = FakeBackend::logged_in("Ada", 10);
    let loader = WrapLoader::new(backend.clone(), 5);
    loader.mount().await;

    let first = loader.reload(3);
    let second = loader.reload(7);
    assert_eq!(loader.snapshot().limit, 7);

    // Polling the later cycle first does not change who wins
    let (second, first) = tokio::join!(second, first);
    assert_eq!(second, CycleOutcome::Completed);
    assert_eq!(first, CycleOutcome::Superseded);

    let state = loader.snapshot();
    assert_eq!(state.limit, 7);
    assert_eq!(state.tracks.len(), 7);
    assert!(state.is_settled());
}
