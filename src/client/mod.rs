//! # Client Module
//!
//! The consumer side of the backend: probes the session, loads the wrap
//! (profile + top tracks) through a fade-out / fetch / fade-in cycle, and
//! renders the result.
//!
//! ```text
//! WrapLoader (state machine, owns WrapState)
//!     ↓ Backend trait
//! HttpBackend (reqwest, session cookie)
//!     ↓
//! monthlywrap backend (/user-info, /top-tracks)
//! ```
//!
//! [`render::render`] turns a [`wrap::WrapState`] snapshot into a
//! [`render::View`]; the terminal prints its `Display` form.

use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{Track, UserProfile};

pub mod http;
pub mod render;
pub mod wrap;

pub use http::HttpBackend;
pub use render::{Card, View, WrapBody, WrapView, render};
pub use wrap::{CycleOutcome, FadeTiming, Phase, WrapLoader, WrapState};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error! status: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// The two backend calls the wrap needs.
///
/// Every call is credentialed: implementations attach the session.
pub trait Backend: Send + Sync + 'static {
    fn user_info(&self) -> impl Future<Output = Result<UserProfile, ClientError>> + Send;

    fn top_tracks(&self, limit: u8)
    -> impl Future<Output = Result<Vec<Track>, ClientError>> + Send;
}
