//! Path utilities for nuru.
//!
//! All local state lives under `~/.nuru/`:
//! - `~/.nuru/config.toml` - configuration
//! - `~/.nuru/session.toml` - persisted sign-in session

use std::path::PathBuf;

/// Returns the nuru home directory (`~/.nuru/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nuru")
}

/// Returns the default config file path (`~/.nuru/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default session record path (`~/.nuru/session.toml`).
pub fn default_session() -> PathBuf {
    home_dir().join("session.toml")
}
