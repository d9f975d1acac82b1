//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the remote services and the identity provider.

pub mod actor;
pub mod identity;
