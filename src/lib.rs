//! monthlywrap library
//!
//! A Spotify "monthly wrap": an OAuth 2.0 backend that logs users in with
//! Spotify and proxies their profile and short-term top tracks, and a
//! client that loads those through a fade-out / fetch / fade-in cycle and
//! renders them as cards.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the backend
//! - `cli` - Command-line interface implementations
//! - `client` - Session probe, wrap loader state machine and rendering
//! - `config` - Configuration management and environment variables
//! - `error` - Error responses of the HTTP API
//! - `management` - In-memory sessions and token refresh
//! - `server` - Router and server lifecycle
//! - `spotify` - Spotify accounts service and Web API calls
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use monthlywrap::client::{HttpBackend, WrapLoader, render};
//!
//! #[tokio::main]
//! async fn main() {
//!     let loader = WrapLoader::new(HttpBackend::new("http://localhost:8080", None), 5);
//!     loader.mount().await;
//!     println!("{}", render(&loader.snapshot(), "http://localhost:8080"));
//! }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for top-level plumbing (server startup, CLI) where the
/// concrete error type does not matter.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue "o".
///
/// ```
/// info!("Listening on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red error line to stderr and exits with status 1.
///
/// Only for fatal errors in the binary's command paths; library code
/// returns errors instead.
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a recoverable problem to stderr, prefixed with a yellow "!".
///
/// Keeps stdout free for the rendered wrap.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
