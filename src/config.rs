//! Configuration management for the lyricist service.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. All values are read once at startup into a
//! [`Settings`] value that is read-only for the rest of the process lifetime.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory, or in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, fmt, net::SocketAddr, num::NonZeroUsize, path::PathBuf, time::Duration};

use reqwest::Url;
use thiserror::Error;

pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
pub const SPOTIFY_API_AUTH_CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const SPOTIFY_API_AUTH_CLIENT_SECRET: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const SPOTIFY_API_REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
pub const SPOTIFY_API_AUTH_SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const SPOTIFY_API_AUTH_URL: &str = "SPOTIFY_API_AUTH_URL";
pub const SPOTIFY_API_TOKEN_URL: &str = "SPOTIFY_API_TOKEN_URL";
pub const SPOTIFY_API_URL: &str = "SPOTIFY_API_URL";
pub const LYRICS_API_URL: &str = "LYRICS_API_URL";
pub const LYRICIST_KEY: &str = "LYRICIST_KEY";
pub const LYRICIST_SESSION_TTL: &str = "LYRICIST_SESSION_TTL";
pub const LYRICIST_CACHE_CAPACITY: &str = "LYRICIST_CACHE_CAPACITY";
pub const LYRICIST_STORE_URL: &str = "LYRICIST_STORE_URL";
pub const LYRICIST_STORE_TIMEOUT_MS: &str = "LYRICIST_STORE_TIMEOUT_MS";
pub const LYRICIST_UPSTREAM_TIMEOUT_MS: &str = "LYRICIST_UPSTREAM_TIMEOUT_MS";
pub const LYRICIST_SECURE_COOKIES: &str = "LYRICIST_SECURE_COOKIES";

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
const DEFAULT_SCOPE: &str =
    "user-read-currently-playing user-read-playback-state user-modify-playback-state";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_LYRICS_API_URL: &str = "https://lrclib.net";
const DEFAULT_SESSION_TTL_SECS: u64 = 900;
const DEFAULT_CACHE_CAPACITY: usize = 100;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Loads environment variables from a `.env` file.
///
/// Looks for `.env` in the current working directory first and falls back to
/// the platform-specific local data directory under `lyricist/.env`. The
/// directory is created when missing so users find the copied
/// `.env.example` next to it.
///
/// # Directory Structure
///
/// The fallback `.env` file lives in:
/// - Linux: `~/.local/share/lyricist/.env`
/// - macOS: `~/Library/Application Support/lyricist/.env`
/// - Windows: `%LOCALAPPDATA%/lyricist/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed. A missing file is not an error since
/// every value can also come from the process environment.
pub async fn load_env() -> Result<(), String> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        return dotenv::from_path(&local).map_err(|e| e.to_string());
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lyricist/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Identity provider settings.
#[derive(Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: Url,
    pub token_url: Url,
    pub api_url: Url,
}

/// Process-wide configuration, loaded once at startup.
#[derive(Clone)]
pub struct Settings {
    pub server_addr: SocketAddr,
    pub spotify: SpotifySettings,
    pub lyrics_api_url: Url,
    pub encryption_secret: String,
    pub session_ttl: Duration,
    pub cache_capacity: NonZeroUsize,
    pub store_url: Option<String>,
    pub store_timeout: Duration,
    pub upstream_timeout: Duration,
    pub secure_cookies: bool,
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the settings through `lookup`, which returns the raw value of a
    /// variable or `None` when it is not set.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let server_addr = parse_or(
            SERVER_ADDRESS,
            get(SERVER_ADDRESS),
            DEFAULT_SERVER_ADDRESS,
            |raw| raw.parse::<SocketAddr>().map_err(|e| e.to_string()),
        )?;

        let spotify = SpotifySettings {
            client_id: get(SPOTIFY_API_AUTH_CLIENT_ID)
                .ok_or(ConfigError::Missing(SPOTIFY_API_AUTH_CLIENT_ID))?,
            client_secret: get(SPOTIFY_API_AUTH_CLIENT_SECRET)
                .ok_or(ConfigError::Missing(SPOTIFY_API_AUTH_CLIENT_SECRET))?,
            redirect_uri: parse_or(
                SPOTIFY_API_REDIRECT_URI,
                get(SPOTIFY_API_REDIRECT_URI),
                DEFAULT_REDIRECT_URI,
                |raw| parse_url(raw).map(|_| raw.to_string()),
            )?,
            scope: get(SPOTIFY_API_AUTH_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: parse_or(
                SPOTIFY_API_AUTH_URL,
                get(SPOTIFY_API_AUTH_URL),
                DEFAULT_AUTH_URL,
                parse_url,
            )?,
            token_url: parse_or(
                SPOTIFY_API_TOKEN_URL,
                get(SPOTIFY_API_TOKEN_URL),
                DEFAULT_TOKEN_URL,
                parse_url,
            )?,
            api_url: parse_or(SPOTIFY_API_URL, get(SPOTIFY_API_URL), DEFAULT_API_URL, parse_url)?,
        };

        let lyrics_api_url =
            parse_or(LYRICS_API_URL, get(LYRICS_API_URL), DEFAULT_LYRICS_API_URL, parse_url)?;

        let encryption_secret = get(LYRICIST_KEY).ok_or(ConfigError::Missing(LYRICIST_KEY))?;

        let session_ttl = Duration::from_secs(parse_positive(
            LYRICIST_SESSION_TTL,
            get(LYRICIST_SESSION_TTL),
            DEFAULT_SESSION_TTL_SECS,
        )?);

        let cache_capacity = match get(LYRICIST_CACHE_CAPACITY) {
            None => NonZeroUsize::new(DEFAULT_CACHE_CAPACITY),
            Some(raw) => raw.trim().parse::<usize>().ok().and_then(NonZeroUsize::new),
        }
        .ok_or_else(|| ConfigError::Invalid {
            name: LYRICIST_CACHE_CAPACITY,
            reason: "expected a positive integer".to_string(),
        })?;

        let store_url = match get(LYRICIST_STORE_URL) {
            Some(raw) => {
                parse_url(&raw).map_err(|reason| ConfigError::Invalid {
                    name: LYRICIST_STORE_URL,
                    reason,
                })?;
                Some(raw)
            }
            None => None,
        };

        let store_timeout = Duration::from_millis(parse_positive(
            LYRICIST_STORE_TIMEOUT_MS,
            get(LYRICIST_STORE_TIMEOUT_MS),
            DEFAULT_STORE_TIMEOUT_MS,
        )?);

        let upstream_timeout = Duration::from_millis(parse_positive(
            LYRICIST_UPSTREAM_TIMEOUT_MS,
            get(LYRICIST_UPSTREAM_TIMEOUT_MS),
            DEFAULT_UPSTREAM_TIMEOUT_MS,
        )?);

        let secure_cookies = match get(LYRICIST_SECURE_COOKIES) {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                name: LYRICIST_SECURE_COOKIES,
                reason: format!("expected true or false, got {raw:?}"),
            })?,
        };

        Ok(Self {
            server_addr,
            spotify,
            lyrics_api_url,
            encryption_secret,
            session_ttl,
            cache_capacity,
            store_url,
            store_timeout,
            upstream_timeout,
            secure_cookies,
        })
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server_addr", &self.server_addr)
            .field("spotify", &self.spotify)
            .field("lyrics_api_url", &self.lyrics_api_url.as_str())
            .field("encryption_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .field("store_url", &self.store_url.as_ref().map(|_| "<redacted>"))
            .field("store_timeout", &self.store_timeout)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl fmt::Debug for SpotifySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifySettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

fn parse_or<T, P>(
    name: &'static str,
    value: Option<String>,
    default: &str,
    parse: P,
) -> Result<T, ConfigError>
where
    P: Fn(&str) -> Result<T, String>,
{
    let raw = value.unwrap_or_else(|| default.to_string());
    parse(raw.trim()).map_err(|reason| ConfigError::Invalid { name, reason })
}

fn parse_positive(name: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::Invalid {
                name,
                reason: "expected a positive integer".to_string(),
            }),
            Ok(parsed) => Ok(parsed),
        },
    }
}

fn parse_url(raw: &str) -> Result<Url, String> {
    Url::parse(raw).map_err(|e| e.to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
