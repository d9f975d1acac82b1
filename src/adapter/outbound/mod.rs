//! Outbound adapters (driven side).

#[cfg(feature = "ic")]
pub mod ic;
pub mod identity;
