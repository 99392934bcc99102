//! Lyrics lookup.
//!
//! [`LrclibClient`] talks to an lrclib-compatible service. [`LyricsService`]
//! puts the [`LyricsCache`] in front of any [`LyricsSource`] so the same
//! `(artist, title)` is fetched at most once while it stays cached. Misses
//! are cached as [`Lyrics::NotFound`] so a track without lyrics does not
//! hammer the upstream; failures are never cached.

use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::{
    management::LyricsCache,
    types::{LrclibTrack, Lyrics},
    utils,
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lyrics service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("lyrics service answered {0}")]
    Status(StatusCode),
}

#[async_trait]
pub trait LyricsSource: Send + Sync {
    async fn fetch(&self, artist: &str, title: &str) -> Result<Lyrics, LookupError>;
}

pub struct LrclibClient {
    http: Client,
    base_url: Url,
}

impl LrclibClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}/api/get", self.base_url.path().trim_end_matches('/')));
        url
    }
}

#[async_trait]
impl LyricsSource for LrclibClient {
    async fn fetch(&self, artist: &str, title: &str) -> Result<Lyrics, LookupError> {
        let request = self
            .http
            .get(self.endpoint())
            .query(&[("artist_name", artist), ("track_name", title)]);

        let response = utils::send_with_retry(request).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(Lyrics::NotFound),
            status if status.is_success() => {
                let track = response.json::<LrclibTrack>().await?;
                Ok(match track.plain_lyrics {
                    Some(text) if !text.trim().is_empty() => Lyrics::Found(text),
                    _ if track.instrumental => Lyrics::Instrumental,
                    _ => Lyrics::NotFound,
                })
            }
            status => Err(LookupError::Status(status)),
        }
    }
}

/// Cache-through lyrics lookup.
pub struct LyricsService {
    cache: LyricsCache,
    source: Arc<dyn LyricsSource>,
}

impl LyricsService {
    pub fn new(source: Arc<dyn LyricsSource>, capacity: NonZeroUsize) -> Self {
        Self {
            cache: LyricsCache::new(capacity),
            source,
        }
    }

    pub fn cache(&self) -> &LyricsCache {
        &self.cache
    }

    pub async fn lookup(&self, artist: &str, title: &str) -> Result<Lyrics, LookupError> {
        if let Some(cached) = self.cache.get(artist, title) {
            return Ok(cached);
        }

        let lyrics = self.source.fetch(artist, title).await?;
        self.cache.put(artist, title, lyrics.clone());
        Ok(lyrics)
    }
}
