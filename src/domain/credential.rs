//! Authenticated identity handle.

use std::fmt;
use std::sync::Arc;

use super::id::PrincipalId;

/// Authenticated identity plus its stable public identifier.
///
/// The key material is opaque to everything but the transport adapter,
/// which turns it into a request signer. Cloning shares the same bytes.
#[derive(Clone)]
pub struct Credential {
    principal: PrincipalId,
    key: Arc<[u8]>,
}

impl Credential {
    pub fn new(principal: PrincipalId, key: impl Into<Arc<[u8]>>) -> Self {
        Self {
            principal,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }

    /// Raw signing key material (PEM for the Internet Computer adapter).
    #[must_use]
    pub fn key_material(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("principal", &self.principal)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.principal == other.principal
    }
}
