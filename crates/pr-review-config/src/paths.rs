//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/pr-review/`, `~/.cache/pr-review/`
//! - macOS: `~/Library/Application Support/pr-review/`, `~/Library/Caches/pr-review/`
//! - Windows: `%APPDATA%\pr-review\`, `%LOCALAPPDATA%\pr-review\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "pr-review";

/// Get the application config directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Default location of recorded responses
pub fn recordings_dir() -> Result<PathBuf> {
    Ok(cache_dir()?.join("recordings"))
}
