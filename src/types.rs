use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Credential issued by the identity provider.
///
/// This is what gets encrypted into a session. `Debug` hides the secrets.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub obtained_at: u64,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// `GET /me/player/currently-playing` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    pub item: Option<TrackItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

/// `GET /me/player` response, read before toggling shuffle.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStateResponse {
    #[serde(default)]
    pub shuffle_state: bool,
}

/// Track the user is listening to right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    /// Primary artist, used for the lyrics lookup.
    pub artist: String,
    /// All credited artists.
    pub artists: Vec<String>,
    pub title: String,
    pub album: Option<String>,
    pub is_playing: bool,
}

impl NowPlaying {
    /// Converts a Web API response, or `None` when nothing (or no track,
    /// e.g. an ad) is playing.
    pub fn from_response(response: CurrentlyPlayingResponse) -> Option<Self> {
        let item = response.item?;
        let artists: Vec<String> = item.artists.into_iter().map(|a| a.name).collect();
        let artist = artists.first()?.clone();
        Some(Self {
            artist,
            artists,
            title: item.name,
            album: item.album.map(|a| a.name),
            is_playing: response.is_playing,
        })
    }
}

/// Player controls forwarded to the Web API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Play,
    Pause,
    Next,
    Previous,
    /// Flips the current shuffle state.
    Shuffle,
}

impl PlayerAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerAction::Play => "play",
            PlayerAction::Pause => "pause",
            PlayerAction::Next => "next",
            PlayerAction::Previous => "previous",
            PlayerAction::Shuffle => "shuffle",
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "play" => Ok(PlayerAction::Play),
            "pause" => Ok(PlayerAction::Pause),
            "next" => Ok(PlayerAction::Next),
            "previous" | "prev" => Ok(PlayerAction::Previous),
            "shuffle" => Ok(PlayerAction::Shuffle),
            other => Err(format!("unknown player action: {other}")),
        }
    }
}

/// Result of a lyrics lookup. `Instrumental` and `NotFound` are cached like
/// a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lyrics {
    Found(String),
    /// lrclib knows the track and marks it as having no vocals.
    Instrumental,
    NotFound,
}

/// lrclib `GET /api/get` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LrclibTrack {
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub instrumental: bool,
}
