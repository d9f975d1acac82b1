//! Request signers built from PEM key material.

use ic_agent::identity::{BasicIdentity, Secp256k1Identity};
use ic_agent::Identity;

use crate::domain::PrincipalId;
use crate::error::SessionError;

/// Parse an Ed25519 or secp256k1 PEM key (the two formats `dfx` writes).
pub fn identity_from_pem(pem: &[u8]) -> Result<Box<dyn Identity>, SessionError> {
    if let Ok(identity) = BasicIdentity::from_pem(pem) {
        return Ok(Box::new(identity));
    }
    Secp256k1Identity::from_pem(pem)
        .map(|identity| Box::new(identity) as Box<dyn Identity>)
        .map_err(|e| SessionError::AuthFailed(format!("unsupported identity PEM: {e}")))
}

/// Principal derived from a PEM key.
pub fn principal_from_pem(pem: &[u8]) -> Result<PrincipalId, SessionError> {
    let identity = identity_from_pem(pem)?;
    let sender = identity.sender().map_err(SessionError::AuthFailed)?;
    Ok(PrincipalId::new(sender.to_text()))
}
