use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    Res,
    api::{self, AppState},
    config::{self, Settings},
    crypto::EncryptionKey,
    info,
    lyrics::{LrclibClient, LyricsService},
    management::{Backend, MemoryBackend, RedisBackend, SessionStore, StateTracker},
    spotify::SpotifyClient,
    success, warning,
};

/// Connects the store and builds the clients every handler shares.
///
/// Uses Redis when a store URL is configured and an in-process table
/// otherwise. The connection attempt is bounded by the store timeout.
pub async fn build_state(settings: &Settings) -> Res<AppState> {
    let backend: Arc<dyn Backend> = match &settings.store_url {
        Some(url) => {
            let backend = RedisBackend::connect(url, settings.store_timeout).await?;
            info!("Using Redis session store");
            Arc::new(backend)
        }
        None => {
            warning!(
                "{} not set, sessions are kept in memory and lost on restart",
                config::LYRICIST_STORE_URL
            );
            Arc::new(MemoryBackend::new())
        }
    };

    let sessions = SessionStore::new(
        Arc::clone(&backend),
        settings.session_ttl,
        settings.store_timeout,
    );
    let states = StateTracker::new(backend, settings.session_ttl, settings.store_timeout);

    let provider = SpotifyClient::new(settings.spotify.clone(), settings.upstream_timeout)?;
    let source = LrclibClient::new(settings.lyrics_api_url.clone(), settings.upstream_timeout)?;

    Ok(AppState {
        sessions: Arc::new(sessions),
        states: Arc::new(states),
        key: Arc::new(EncryptionKey::derive(&settings.encryption_secret)),
        provider: Arc::new(provider),
        lyrics: Arc::new(LyricsService::new(Arc::new(source), settings.cache_capacity)),
        secure_cookies: settings.secure_cookies,
    })
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(api::index))
        .route("/player/{action}", post(api::player))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    Router::new()
        .route("/authenticate", get(api::authenticate))
        .route("/callback", get(api::callback))
        .route("/logout", get(api::logout))
        .route("/health", get(api::health))
        .route("/favicon.ico", get(|| async { StatusCode::NOT_FOUND }))
        .merge(protected)
        .with_state(state)
}

pub async fn start_api_server(settings: Settings) -> Res<()> {
    let state = build_state(&settings).await?;

    let listener = tokio::net::TcpListener::bind(settings.server_addr).await?;
    success!("Listening on http://{}", settings.server_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warning!("Cannot listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await
        }
    }
}
