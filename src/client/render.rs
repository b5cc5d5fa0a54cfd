use std::fmt;

use colored::Colorize;
use tabled::Table;

use crate::{
    client::WrapState,
    types::{CardTableRow, Track},
    utils::{self, MAX_LIMIT, MIN_LIMIT},
};

pub const NO_TRACKS_MESSAGE: &str = "No tracks found for this period.";
pub const LOGIN_MESSAGE: &str = "Log in with Spotify to see your monthly wrap.";

/// What the user sees for a given [`WrapState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    LoginPrompt { login_url: String },
    Wrap(WrapView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapView {
    pub greeting: String,
    pub limit: u8,
    pub limit_options: Vec<u8>,
    pub error: Option<String>,
    /// Fade-out styling while a cycle is reloading.
    pub faded: bool,
    pub body: WrapBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapBody {
    Cards(Vec<Card>),
    NoTracks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub artists: String,
    pub image_url: Option<String>,
}

impl From<&Track> for Card {
    fn from(track: &Track) -> Self {
        Card {
            title: track.name.clone(),
            artists: utils::join_artists(&track.artists),
            image_url: track.album_image.clone(),
        }
    }
}

pub fn render(state: &WrapState, backend_url: &str) -> View {
    if !state.is_logged_in {
        return View::LoginPrompt {
            login_url: format!("{}/login", backend_url.trim_end_matches('/')),
        };
    }

    let body = if state.tracks.is_empty() && !state.is_reloading {
        WrapBody::NoTracks
    } else {
        WrapBody::Cards(state.tracks.iter().map(Card::from).collect())
    };

    View::Wrap(WrapView {
        greeting: format!("Welcome, {}!", state.display_name),
        limit: state.limit,
        limit_options: (MIN_LIMIT..=MAX_LIMIT).collect(),
        error: state.error.clone(),
        faded: state.is_reloading,
        body,
    })
}

impl View {
    pub fn card_count(&self) -> usize {
        match self {
            View::Wrap(WrapView {
                body: WrapBody::Cards(cards),
                ..
            }) => cards.len(),
            _ => 0,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::LoginPrompt { login_url } => {
                writeln!(f, "{}", LOGIN_MESSAGE.bold())?;
                write!(f, "Login: {}", login_url.underline())
            }
            View::Wrap(view) => write!(f, "{view}"),
        }
    }
}

impl fmt::Display for WrapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.greeting.bold())?;

        let options: Vec<String> = self
            .limit_options
            .iter()
            .map(|option| {
                if *option == self.limit {
                    format!("[{option}]").green().bold().to_string()
                } else {
                    option.to_string()
                }
            })
            .collect();
        writeln!(f, "Top tracks: {}", options.join(" "))?;

        if let Some(error) = &self.error {
            writeln!(f, "{}", error.red())?;
        }

        match &self.body {
            WrapBody::NoTracks => write!(f, "{NO_TRACKS_MESSAGE}"),
            WrapBody::Cards(cards) if cards.is_empty() => Ok(()),
            WrapBody::Cards(cards) => {
                let rows: Vec<CardTableRow> = cards
                    .iter()
                    .enumerate()
                    .map(|(i, card)| CardTableRow {
                        rank: i + 1,
                        title: card.title.clone(),
                        artists: card.artists.clone(),
                        album_art: card.image_url.clone().unwrap_or_else(|| "-".to_string()),
                    })
                    .collect();

                let table = Table::new(rows).to_string();
                if self.faded {
                    write!(f, "{}", table.dimmed())
                } else {
                    write!(f, "{table}")
                }
            }
        }
    }
}
