use std::sync::Arc;

use crate::{
    crypto::EncryptionKey,
    lyrics::LyricsService,
    management::{SessionStore, StateTracker},
    spotify::IdentityProvider,
};

/// Shared state handed to every handler.
///
/// Everything in here is read-only after startup or synchronizes internally,
/// so cloning per request only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub states: Arc<StateTracker>,
    pub key: Arc<EncryptionKey>,
    pub provider: Arc<dyn IdentityProvider>,
    pub lyrics: Arc<LyricsService>,
    pub secure_cookies: bool,
}
