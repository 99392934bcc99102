//! Spotify Live Lyricist Library
//!
//! This library implements a small web service that signs a user in with Spotify
//! through the OAuth2 authorization-code flow, binds the resulting credential to
//! a short-lived server-side session, and shows the lyrics of the track that is
//! currently playing. Lyrics are expensive to look up, so they are kept in a
//! bounded recency cache.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the session guard middleware
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `crypto` - Symmetric encryption of credentials at rest
//! - `lyrics` - Lyrics lookup client and cache-through service
//! - `management` - Session store, login state tracker, backends and cache
//! - `server` - Application state wiring and the HTTP server
//! - `spotify` - Spotify accounts and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use lyricist::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> lyricist::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod lyrics;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the edges of the application (startup, CLI commands) where the
/// concrete error type does not matter and only needs to be reported. Inner
/// modules return their own typed errors.
///
/// # Example
///
/// ```
/// use lyricist::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Session created");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal startup failures. Request handlers never call this;
/// they log with [`warning!`] and answer with an error response instead.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures, most notably request-path errors that are
/// turned into an opaque HTTP error for the caller.
///
/// # Example
///
/// ```
/// warning!("Session store unavailable: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
