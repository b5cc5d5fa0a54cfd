use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub const MIN_LIMIT: u8 = 1;
pub const MAX_LIMIT: u8 = 10;
pub const DEFAULT_LIMIT: u8 = 5;

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

pub fn generate_session_id() -> String {
    random_alphanumeric(64)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn now_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub fn clamp_limit(limit: i64) -> u8 {
    limit.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as u8
}

/// Reads the `limit` query value the way `/top-tracks` does: anything that
/// is not an integer falls back to the default, integers are clamped.
pub fn parse_limit(raw: Option<&str>) -> u8 {
    match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
        Some(limit) => clamp_limit(limit),
        None => DEFAULT_LIMIT,
    }
}

pub fn join_artists(artists: &[String]) -> String {
    artists.join(", ")
}

/// Finds a cookie by name in a raw `Cookie` header value.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
