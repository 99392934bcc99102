//! # CLI Module
//!
//! Command implementations for the `lyricist` binary.
//!
//! ## Commands
//!
//! - [`serve`] - Loads the configuration and runs the web service until Ctrl-C
//! - [`keygen`] - Prints a random value for `LYRICIST_KEY`
//!
//! Shell completions are generated directly in `main`.
//!
//! ## Usage Patterns
//!
//! ### Initial Setup
//! ```bash
//! lyricist keygen >> ~/.local/share/lyricist/.env   # Create the encryption secret
//! lyricist serve                                     # Start on SERVER_ADDRESS
//! ```
//!
//! ### Overriding the Address
//! ```bash
//! lyricist serve --addr 0.0.0.0:8080
//! ```
//!
//! ## Error Handling
//!
//! Configuration and startup failures are fatal: they are printed with the
//! `error!` macro, which exits the process. Everything after startup is
//! reported per request by the web layer.

mod keygen;
mod serve;

pub use keygen::keygen;
pub use serve::serve;
