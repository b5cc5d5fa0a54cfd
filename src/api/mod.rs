//! # API Module
//!
//! HTTP endpoints of the monthlywrap backend.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - redirects the browser to Spotify's authorization page
//! - [`callback`] - exchanges the authorization code and opens a session
//! - [`logout`] - drops the session
//!
//! ### Wrap data
//!
//! - [`user_info`] - `{ "display_name": .. }` of the session user
//! - [`top_tracks`] - the user's short-term top tracks, `?limit=1..10`
//!
//! ### Monitoring
//!
//! - [`health`] - status and version
//!
//! ## Sessions
//!
//! A session is an opaque id in the `monthlywrap_session` cookie that keys
//! the Spotify token in [`crate::management::SessionStore`]. Requests
//! without a usable session get `401 {"error": "Not authenticated"}`.
//!
//! ```rust,ignore
//! use monthlywrap::{config::Config, server};
//!
//! let app = server::router(server::AppState::new(Config::from_env()?));
//! ```

mod health;
mod login;
mod session;
mod wrap;

pub use health::health;
pub use login::{CallbackQuery, callback, login, logout};
pub use wrap::{TopTracksQuery, top_tracks, user_info};
