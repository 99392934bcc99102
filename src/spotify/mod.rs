//! # Spotify Integration Module
//!
//! Client for the two Spotify services the lyricist service depends on: the
//! accounts service (OAuth2 authorization-code flow) and the Web API (player
//! state and controls).
//!
//! ## Overview
//!
//! The rest of the application only sees the [`IdentityProvider`] trait. It
//! covers building the authorization URL, exchanging the callback code for a
//! [`Token`], and the handful of player calls the web pages need.
//! [`SpotifyClient`] is the production implementation; tests substitute their
//! own.
//!
//! ```text
//! Auth Gateway (api)
//!          ↓
//! IdentityProvider
//!     ├── Authentication (authorize URL, code exchange)
//!     └── Player (currently playing, play/pause/next/previous/shuffle)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Accounts / Web API
//! ```
//!
//! ## Authentication Strategy
//!
//! The service is a confidential client: the code exchange authenticates with
//! the client id and secret over HTTP basic auth, so the credential never
//! passes through the browser. Refresh tokens are kept inside the credential
//! but never used; once Spotify rejects an access token with 401 the session
//! ends and the user logs in again.
//!
//! ## Error Handling
//!
//! - **Rejected credential**: a 401 from the Web API maps to
//!   [`ApiError::Unauthorized`]
//! - **Bad Gateway**: retried once after a short pause, then reported
//! - **Everything else**: reported as [`ApiError::Status`] or
//!   [`ApiError::Transport`] and surfaced to the user as an upstream failure
//!
//! Every request carries the client-level timeout from the configuration.

pub mod auth;
pub mod player;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::{
    config::SpotifySettings,
    types::{NowPlaying, PlayerAction, Token},
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The provider no longer accepts the access token.
    #[error("credential rejected by the provider")]
    Unauthorized,
    #[error("provider answered {0}")]
    Status(StatusCode),
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Identity provider as seen by the auth gateway.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to for login, carrying `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchanges an authorization code for a credential.
    async fn exchange_code(&self, code: &str) -> Result<Token, ApiError>;

    async fn currently_playing(&self, token: &Token) -> Result<Option<NowPlaying>, ApiError>;

    async fn control(&self, token: &Token, action: PlayerAction) -> Result<(), ApiError>;
}

pub struct SpotifyClient {
    http: Client,
    settings: SpotifySettings,
}

impl SpotifyClient {
    pub fn new(settings: SpotifySettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, settings })
    }

    fn api(&self, path: &str) -> Url {
        let mut url = self.settings.api_url.clone();
        url.set_path(&format!(
            "{}/{}",
            self.settings.api_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        ));
        url
    }
}

#[async_trait]
impl IdentityProvider for SpotifyClient {
    fn authorize_url(&self, state: &str) -> String {
        auth::authorize_url(&self.settings, state)
    }

    async fn exchange_code(&self, code: &str) -> Result<Token, ApiError> {
        auth::exchange_code(&self.http, &self.settings, code).await
    }

    async fn currently_playing(&self, token: &Token) -> Result<Option<NowPlaying>, ApiError> {
        player::currently_playing(&self.http, self.api("me/player/currently-playing"), token).await
    }

    async fn control(&self, token: &Token, action: PlayerAction) -> Result<(), ApiError> {
        player::control(&self.http, |path| self.api(path), token, action).await
    }
}
