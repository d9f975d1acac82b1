//! Persisted session record (`session.toml`).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PrincipalId;
use crate::error::SessionError;

/// What survives between invocations: which key signed in, and as whom.
///
/// The key itself stays in its PEM file; the record only points at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub principal: PrincipalId,
    pub pem_path: PathBuf,
    pub signed_in_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Read a record. A missing file is `Ok(None)`.
    pub async fn load(path: &Path) -> Result<Option<Self>, SessionError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Storage(e.to_string())),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| SessionError::Storage(format!("{}: {e}", path.display())))
    }

    pub async fn save(&self, path: &Path) -> Result<(), SessionError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SessionError::Storage(e.to_string()))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    /// Delete the record. Removing a missing record succeeds.
    pub async fn remove(path: &Path) -> Result<(), SessionError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}
