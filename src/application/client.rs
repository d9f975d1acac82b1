//! Client façade wiring the session, gateway and aggregator together.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::aggregator::Aggregator;
use super::gateway::Gateway;
use super::session::{SessionManager, SessionStatus};
use crate::domain::Credential;
use crate::error::Result;
use crate::port::{ActorConnector, IdentityProvider};

/// One client instance per process.
///
/// Owns the three application services and chains them for the sign-in
/// and sign-out flows. Everything else is reached through the accessors.
pub struct NuruClient {
    session: Arc<SessionManager>,
    gateway: Arc<Gateway>,
    aggregator: Arc<Aggregator>,
}

impl NuruClient {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        connector: Arc<dyn ActorConnector>,
        call_timeout: Duration,
    ) -> Self {
        let gateway = Arc::new(Gateway::new(connector, call_timeout));
        Self {
            session: Arc::new(SessionManager::new(provider)),
            aggregator: Aggregator::new(Arc::clone(&gateway)),
            gateway,
        }
    }

    /// Load public data and restore any persisted session concurrently.
    pub async fn start(&self) -> Result<SessionStatus> {
        let (_, status) = tokio::join!(self.aggregator.bootstrap(), self.restore());
        status
    }

    /// Restore a persisted session without loading public data.
    ///
    /// A restored session installs its credential in the gateway and loads
    /// the user's profile.
    ///
    /// If the actors cannot be bound, the credential is dropped from memory
    /// and the session reports unauthenticated. The persisted session is
    /// kept for the next restore.
    pub async fn restore(&self) -> Result<SessionStatus> {
        let status = self.session.initialize().await?;
        if let Some(credential) = self.session.credential() {
            if let Err(err) = self.resume(&credential).await {
                self.session.discard();
                return Err(err);
            }
        }
        Ok(status)
    }

    /// Interactive sign-in. Returns whether the user is registered.
    ///
    /// A sign-in whose actors cannot be bound is rolled back with a full
    /// sign-out.
    pub async fn sign_in(&self) -> Result<bool> {
        let credential = self.session.sign_in().await?;
        match self.resume(&credential).await {
            Ok(registered) => Ok(registered),
            Err(err) => {
                self.session.sign_out().await;
                Err(err)
            }
        }
    }

    async fn resume(&self, credential: &Credential) -> Result<bool> {
        if let Err(err) = self.gateway.initialize(credential).await {
            warn!(error = %err, "Could not bind actors to credential");
            return Err(err.into());
        }
        let registered = self.aggregator.sign_in(credential).await;
        info!(principal = %credential.principal(), registered, "Session ready");
        Ok(registered)
    }

    /// Sign out everywhere. Never fails.
    pub async fn sign_out(&self) {
        self.session.sign_out().await;
        self.gateway.reset();
        self.aggregator.sign_out();
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}
