//! Identity file locations.

use std::path::PathBuf;

use serde::Deserialize;

use crate::adapter::inbound::cli::paths;

/// Where the PEM identity and the persisted session live.
///
/// `pem_path` may also come from `NURU_IDENTITY_PEM` at runtime. Without
/// either, sign-in prompts for a path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub pem_path: Option<PathBuf>,
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

impl IdentityConfig {
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(paths::default_session)
    }
}
