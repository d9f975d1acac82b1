//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`backend`] - In-memory [`MockBackend`](backend::MockBackend) serving all
//!   four actor traits, plus [`MockConnector`](backend::MockConnector).
//! - [`identity`] - [`ScriptedIdentityProvider`](identity::ScriptedIdentityProvider).
//! - [`domain`] - Builders for pools, proposals, strategies and positions.

pub mod backend;
pub mod domain;
pub mod identity;

use std::sync::Arc;
use std::time::Duration;

use crate::application::{Aggregator, Gateway, NuruClient};

/// Call timeout used by test gateways.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Gateway over `connector` with the test timeout.
pub fn gateway(connector: &Arc<backend::MockConnector>) -> Arc<Gateway> {
    Arc::new(Gateway::new(Arc::clone(connector) as _, TEST_TIMEOUT))
}

/// Aggregator over a fresh gateway.
pub fn aggregator(connector: &Arc<backend::MockConnector>) -> Arc<Aggregator> {
    Aggregator::new(gateway(connector))
}

/// Full client wired to scripted collaborators.
pub fn client(
    provider: &Arc<identity::ScriptedIdentityProvider>,
    connector: &Arc<backend::MockConnector>,
) -> NuruClient {
    NuruClient::new(
        Arc::clone(provider) as _,
        Arc::clone(connector) as _,
        TEST_TIMEOUT,
    )
}
