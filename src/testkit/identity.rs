//! Scripted [`IdentityProvider`] for session tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::domain::Credential;
use crate::error::SessionError;
use crate::port::IdentityProvider;

/// Provider with a canned persisted session and queued login outcomes.
///
/// `login` pops the next queued result; an empty queue fails with
/// [`SessionError::AuthFailed`]. A successful login becomes the persisted
/// session, logout clears it.
#[derive(Default)]
pub struct ScriptedIdentityProvider {
    persisted: Mutex<Option<Credential>>,
    restore_error: Mutex<Option<SessionError>>,
    logins: Mutex<VecDeque<Result<Credential, SessionError>>>,
    logout_error: Mutex<Option<SessionError>>,
    login_gate: Mutex<Option<Arc<Semaphore>>>,
    restore_count: AtomicU32,
    login_count: AtomicU32,
    logout_count: AtomicU32,
}

impl ScriptedIdentityProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Provider that restores `credential` without interaction.
    pub fn restoring(credential: Credential) -> Arc<Self> {
        let provider = Self::default();
        *provider.persisted.lock() = Some(credential);
        Arc::new(provider)
    }

    pub fn queue_login(&self, result: Result<Credential, SessionError>) {
        self.logins.lock().push_back(result);
    }

    pub fn fail_restore(&self, error: SessionError) {
        *self.restore_error.lock() = Some(error);
    }

    pub fn fail_logout(&self, error: SessionError) {
        *self.logout_error.lock() = Some(error);
    }

    /// Block `login` until [`release_login`](Self::release_login).
    pub fn hold_login(&self) {
        *self.login_gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_login(&self) {
        if let Some(gate) = self.login_gate.lock().take() {
            gate.add_permits(1);
        }
    }

    pub fn persisted(&self) -> Option<Credential> {
        self.persisted.lock().clone()
    }

    pub fn restore_count(&self) -> u32 {
        self.restore_count.load(Ordering::SeqCst)
    }

    pub fn login_count(&self) -> u32 {
        self.login_count.load(Ordering::SeqCst)
    }

    pub fn logout_count(&self) -> u32 {
        self.logout_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn restore(&self) -> Result<Option<Credential>, SessionError> {
        self.restore_count.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.restore_error.lock().clone() {
            return Err(error);
        }
        Ok(self.persisted.lock().clone())
    }

    async fn login(&self) -> Result<Credential, SessionError> {
        self.login_count.fetch_add(1, Ordering::SeqCst);
        let gate = self.login_gate.lock().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }

        let next = self.logins.lock().pop_front();
        let credential = next
            .unwrap_or_else(|| Err(SessionError::AuthFailed("no login scripted".into())))?;
        *self.persisted.lock() = Some(credential.clone());
        Ok(credential)
    }

    async fn logout(&self) -> Result<(), SessionError> {
        self.logout_count.fetch_add(1, Ordering::SeqCst);
        self.persisted.lock().take();
        match self.logout_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
