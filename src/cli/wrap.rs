use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::watch,
    task::JoinSet,
};

use crate::{
    client::{Backend, HttpBackend, WrapLoader, WrapState, render},
    info,
    utils::{MAX_LIMIT, MIN_LIMIT},
    warning,
};

/// Mounts the wrap against `backend_url` and prints it.
///
/// When logged out only the login prompt is printed (and, with `open`, the
/// login page is opened in the browser). With `interactive`, every stdin
/// line is a new limit; the view is printed again whenever a cycle settles.
pub async fn wrap(
    backend_url: String,
    session: Option<String>,
    limit: u8,
    interactive: bool,
    open: bool,
) {
    let backend = HttpBackend::new(backend_url, session);
    let base_url = backend.base_url().to_string();
    let login_url = backend.login_url();
    let loader = WrapLoader::new(backend, limit);

    let pb = spinner("Loading your wrap...");
    let mounted = loader.mount().await;
    pb.finish_and_clear();

    println!("{}", render(&loader.snapshot(), &base_url));

    if mounted.is_none() {
        if open && webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            );
        }
        return;
    }

    if !interactive {
        return;
    }

    info!(
        "Enter a limit between {} and {} to reload, or an empty line to quit.",
        MIN_LIMIT,
        MAX_LIMIT
    );

    let renderer = tokio::spawn(print_settled(
        loader.subscribe(),
        base_url,
        loader.snapshot().generation(),
    ));

    reload_from_lines(loader, BufReader::new(tokio::io::stdin())).await;

    // The loader is gone, so the renderer ends after the final state.
    let _ = renderer.await;
}

/// Reads one limit per line and starts a cycle for each valid one, until EOF
/// or an empty line.
///
/// Cycles run concurrently and the latest line wins. Every
/// started cycle is awaited before returning, and `loader` is dropped
/// afterwards, which closes the state channel for its watchers.
async fn reload_from_lines<B, R>(loader: WrapLoader<B>, input: R)
where
    B: Backend,
    R: AsyncBufRead + Unpin,
{
    let mut cycles = JoinSet::new();
    let mut lines = input.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        match line.parse::<u8>() {
            Ok(limit) if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) => {
                cycles.spawn(loader.reload(limit));
            }
            _ => warning!("Limit must be between {} and {}", MIN_LIMIT, MAX_LIMIT),
        }
    }

    while let Some(result) = cycles.join_next().await {
        if let Err(e) = result {
            warning!("Reload task failed: {}", e);
        }
    }
}

/// Prints the view once per settled cycle, with a spinner while reloading.
async fn print_settled(mut rx: watch::Receiver<WrapState>, base_url: String, mut printed: u64) {
    let mut pb: Option<ProgressBar> = None;

    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();

        if state.is_reloading {
            if pb.is_none() {
                pb = Some(spinner("Reloading..."));
            }
            continue;
        }

        if let Some(p) = pb.take() {
            p.finish_and_clear();
        }

        if state.is_settled() && state.generation() != printed {
            printed = state.generation();
            println!("{}", render(&state, &base_url));
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
