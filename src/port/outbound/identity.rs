//! Identity provider port.

use async_trait::async_trait;

use crate::domain::Credential;
use crate::error::SessionError;

/// External authentication flow plus its persisted session.
///
/// Session storage belongs to the provider; callers only ask whether a
/// previous session can be restored.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Restore a previously persisted session without user interaction.
    async fn restore(&self) -> Result<Option<Credential>, SessionError>;

    /// Run the interactive flow until it completes or fails.
    async fn login(&self) -> Result<Credential, SessionError>;

    /// Invalidate the persisted session.
    async fn logout(&self) -> Result<(), SessionError>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
