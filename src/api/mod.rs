//! # API Module
//!
//! This module provides the HTTP surface of the lyricist service: the OAuth2
//! login endpoints, the session guard, the protected pages and health
//! monitoring.
//!
//! ## Overview
//!
//! The API module is the auth gateway. It owns the request-level state
//! machine every browser goes through:
//!
//! - **Unauthenticated**: no usable session cookie; protected paths redirect
//!   to [`authenticate`]
//! - **LoginPending**: an anti-forgery state has been issued and the browser
//!   is at the provider; the attempt id travels in the `sID` cookie
//! - **Authenticated**: the `session` cookie names a live session; every
//!   request slides its expiry
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`authenticate`] - Starts the authorization-code flow and redirects to
//!   Spotify's authorization server.
//! - [`callback`] - Validates the returned `state`, exchanges the code for a
//!   credential, encrypts it and opens a session.
//! - [`logout`] - Deletes the session and expires the cookie.
//!
//! ### Protected
//!
//! - [`index`] - Shows the track currently playing and its lyrics.
//! - [`player`] - Forwards play, pause, next, previous and shuffle to Spotify.
//!   Mounted for `POST` only; the page renders the controls as forms.
//!
//! Both sit behind [`require_session`], which attaches the decrypted
//! credential to the request as [`Authenticated`].
//!
//! ### Monitoring
//!
//! - [`health`] - Returns application status, version and whether the
//!   session store answers.
//!
//! ## Error Handling
//!
//! Failures are reported through [`GatewayError`]. Validation failures
//! (forged or replayed state, expired session) never reveal more than "log in
//! again". An unreachable store is a server error and is never mistaken for a
//! logged-out user. A credential that no longer decrypts is treated as a
//! missing session.
//!
//! ## Security Considerations
//!
//! - The access token never reaches the browser; cookies carry opaque ids only
//! - Cookies are `HttpOnly` and `SameSite=Lax`, and `Secure` when configured
//! - Each anti-forgery state is accepted at most once
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use lyricist::{server, config::Settings};
//!
//! let settings = Settings::from_env()?;
//! let state = server::build_state(&settings).await?;
//! let app = server::router(state);
//! ```
//!
//! ## Related Modules
//!
//! - [`crate::management`] - Session store and login state tracker
//! - [`crate::spotify`] - Identity provider client
//! - [`crate::lyrics`] - Cached lyrics lookup

mod auth;
pub mod cookies;
mod error;
mod health;
mod middleware;
mod pages;
mod state;

pub use auth::{CallbackParams, authenticate, callback, logout};
pub use error::GatewayError;
pub use health::health;
pub use middleware::{Authenticated, LOGIN_PATH, SessionEnded, end_session, require_session};
pub use pages::{index, player};
pub use state::AppState;
