//! Authenticated identity lifecycle.
//!
//! ```text
//! Uninitialized → Initializing → {Authenticated, Unauthenticated}
//! Unauthenticated → Authenticating → {Authenticated, Unauthenticated}
//! Authenticated → Unauthenticated          (sign-out)
//! ```
//!
//! The manager owns the [`Credential`]; other components borrow clones of it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::{Credential, PrincipalId};
use crate::error::SessionError;
use crate::port::IdentityProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Uninitialized,
    Initializing,
    Authenticating,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    /// Gated content should wait while this is true.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Initializing | Self::Authenticating)
    }
}

pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    status: watch::Sender<SessionStatus>,
    credential: RwLock<Option<Credential>>,
    initialized: AtomicBool,
}

impl SessionManager {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (status, _rx) = watch::channel(SessionStatus::Uninitialized);
        Self {
            provider,
            status,
            credential: RwLock::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    /// Restore a persisted session, if any. Runs once per manager.
    ///
    /// A failing restore is logged and leaves the session unauthenticated.
    pub async fn initialize(&self) -> Result<SessionStatus, SessionError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyInitialized);
        }
        self.status.send_replace(SessionStatus::Initializing);

        let status = match self.provider.restore().await {
            Ok(Some(credential)) => {
                info!(
                    principal = %credential.principal(),
                    provider = self.provider.name(),
                    "Restored existing session"
                );
                *self.credential.write() = Some(credential);
                SessionStatus::Authenticated
            }
            Ok(None) => SessionStatus::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "Session restore failed");
                SessionStatus::Unauthenticated
            }
        };
        self.status.send_replace(status);
        Ok(status)
    }

    /// Run the interactive sign-in flow.
    ///
    /// Already authenticated sessions return their existing credential.
    pub async fn sign_in(&self) -> Result<Credential, SessionError> {
        let mut current = SessionStatus::Uninitialized;
        let claimed = self.status.send_if_modified(|status| {
            current = *status;
            if *status == SessionStatus::Unauthenticated {
                *status = SessionStatus::Authenticating;
                true
            } else {
                false
            }
        });

        if !claimed {
            return match current {
                SessionStatus::Uninitialized | SessionStatus::Initializing => {
                    Err(SessionError::NotInitialized)
                }
                SessionStatus::Authenticating => Err(SessionError::SignInInProgress),
                SessionStatus::Authenticated | SessionStatus::Unauthenticated => self
                    .credential()
                    .ok_or(SessionError::NotInitialized),
            };
        }

        info!(provider = self.provider.name(), "Starting sign-in");
        match self.provider.login().await {
            Ok(credential) => {
                info!(principal = %credential.principal(), "Sign-in completed");
                *self.credential.write() = Some(credential.clone());
                self.status.send_replace(SessionStatus::Authenticated);
                Ok(credential)
            }
            Err(err) => {
                warn!(error = %err, "Sign-in failed");
                self.status.send_replace(SessionStatus::Unauthenticated);
                Err(err)
            }
        }
    }

    /// Invalidate the session. Provider failures are logged, never surfaced.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.logout().await {
            warn!(error = %err, "Logout error");
        }
        self.credential.write().take();
        self.status.send_if_modified(|status| {
            let signed_in = matches!(
                *status,
                SessionStatus::Authenticated | SessionStatus::Authenticating
            );
            if signed_in {
                *status = SessionStatus::Unauthenticated;
            }
            signed_in
        });
        info!("Logout completed");
    }

    /// Drop the in-memory credential without touching the provider.
    ///
    /// A persisted session stays on disk and can be restored later.
    pub fn discard(&self) {
        if self.credential.write().take().is_some() {
            warn!("Discarded credential that could not be used");
        }
        self.status.send_if_modified(|status| {
            let signed_in = *status == SessionStatus::Authenticated;
            if signed_in {
                *status = SessionStatus::Unauthenticated;
            }
            signed_in
        });
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    #[must_use]
    pub fn principal(&self) -> Option<PrincipalId> {
        self.credential
            .read()
            .as_ref()
            .map(|c| c.principal().clone())
    }
}
