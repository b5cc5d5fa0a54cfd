//! # Spotify Integration Module
//!
//! Thin client for the parts of Spotify the backend needs: the accounts
//! service (authorization URL, code exchange, token refresh) and two Web API
//! endpoints of the logged-in user.
//!
//! ## Architecture
//!
//! ```text
//! API handlers (/login, /callback, /user-info, /top-tracks)
//!          ↓
//! Session management (TokenManager, SessionStore)
//!          ↓
//! Spotify Integration Layer
//!     ├── auth  (authorize URL, code exchange, refresh)
//!     └── user  (profile, top tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! - `GET /authorize` - browser redirect target built by [`auth::authorize_url`]
//! - `POST /api/token` - code exchange and refresh
//! - `GET /me` - profile of the token owner
//! - `GET /me/top/tracks` - short-term top tracks
//!
//! All base URLs come from [`crate::config::Config`], which lets tests run
//! the whole flow against a local stand-in.
//!
//! ## Errors
//!
//! Every call returns [`SpotifyError`]. Non-2xx Web API responses surface as
//! [`SpotifyError::Http`] through `error_for_status`; accounts-service error
//! payloads surface as [`SpotifyError::Auth`].

pub mod auth;
mod error;
pub mod user;

pub use error::SpotifyError;
