//! Build script for the lyricist service.
//!
//! Copies the `.env.example` template into the local data directory, next to
//! the `.env` file the service reads at startup, so a fresh install has a
//! documented starting point for its configuration.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the local data directory.
///
/// Destination:
/// - Linux: `~/.local/share/lyricist/.env.example`
/// - macOS: `~/Library/Application Support/lyricist/.env.example`
/// - Windows: `%LOCALAPPDATA%/lyricist/.env.example`
///
/// A missing template only produces a cargo warning. The existing `.env` is
/// never touched.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let template = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join(".env.example");

    let mut target_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    target_dir.push("lyricist");
    fs::create_dir_all(&target_dir)?;

    if template.is_file() {
        fs::copy(&template, target_dir.join(".env.example"))?;
    } else {
        println!("cargo:warning=.env.example not found at {}", template.display());
    }

    Ok(())
}
