//! # Management Module
//!
//! Server-side state of the lyricist service: who is logged in, which logins
//! are in flight, and which lyrics have already been fetched.
//!
//! ## Components
//!
//! - [`SessionStore`] - encrypted-credential sessions keyed by an opaque id,
//!   with a sliding TTL that is reset on every authenticated request
//! - [`StateTracker`] - one-time anti-forgery states binding a login
//!   initiation to its provider callback
//! - [`LyricsCache`] - bounded least-recently-used cache keyed by the
//!   normalized `(artist, title)` pair
//!
//! ## Backends
//!
//! Sessions and login states are persisted through the [`Backend`] trait so
//! the same code runs on a shared store or inside a single process:
//!
//! - [`RedisBackend`] - shared Redis instance; expiry is enforced by Redis,
//!   so a fleet of servers agrees on which sessions are valid and sessions
//!   survive a restart
//! - [`MemoryBackend`] - locked in-process table that checks expiry on read,
//!   for single-instance deployments and tests
//!
//! Every backend call is bounded by a timeout. A slow or unreachable store
//! surfaces as [`StoreError`] and is never mistaken for a missing session.
//!
//! ## Key Layout
//!
//! ```text
//! session:<session id>  -> {"token": "<base64 IV||ciphertext>", "last_activity": "<rfc3339>"}
//! state:<attempt id>    -> <anti-forgery state>
//! ```
//!
//! The lyrics cache is process-local and never persisted.

mod backend;
mod cache;
mod redis_backend;
mod session;
mod state;

pub use backend::Backend;
pub use backend::MemoryBackend;
pub use backend::StoreError;
pub use backend::bounded;
pub use cache::LyricsCache;
pub use cache::RecencyCache;
pub use cache::TrackKey;
pub use redis_backend::RedisBackend;
pub use session::Session;
pub use session::SessionError;
pub use session::SessionId;
pub use session::SessionStore;
pub use state::PendingLogin;
pub use state::StateError;
pub use state::StateTracker;
