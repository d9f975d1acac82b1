//! Composition root: turns a [`Config`] into a ready [`NuruClient`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::ic::identity::principal_from_pem;
use crate::adapter::outbound::ic::IcConnector;
use crate::adapter::outbound::identity::pem::{PemIdentityProvider, PrincipalDeriver};
use crate::application::NuruClient;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Build a client backed by the replica and PEM identity in `config`.
///
/// # Errors
///
/// Returns an error if a canister id is malformed.
pub fn build_client(config: &Config) -> Result<NuruClient> {
    let connector = IcConnector::from_config(config)?;
    let derive: PrincipalDeriver = Arc::new(principal_from_pem);
    let provider = PemIdentityProvider::new(
        config.identity.pem_path.clone(),
        config.identity.session_path(),
        config.identity_provider(),
        derive,
    );

    info!(
        environment = %config.environment,
        host = config.host(),
        timeout_ms = config.network.call_timeout_ms,
        "Client configured"
    );
    Ok(NuruClient::new(
        Arc::new(provider),
        Arc::new(connector),
        config.network.call_timeout(),
    ))
}
