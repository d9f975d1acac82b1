//! Builds actor sets against a replica.

use std::sync::Arc;

use async_trait::async_trait;
use candid::Principal;
use ic_agent::identity::AnonymousIdentity;
use ic_agent::{Agent, Identity};
use tracing::{debug, info};

use super::canister::{Canister, CoreCanister, CustodyCanister, GovernanceCanister, YieldCanister};
use super::identity::identity_from_pem;
use crate::domain::Credential;
use crate::error::{ConfigError, GatewayError};
use crate::infrastructure::config::settings::Config;
use crate::port::{ActorConnector, ActorSet, CallResult};

/// Parsed ids of the four backend canisters.
#[derive(Debug, Clone, Copy)]
pub struct CanisterIds {
    pub core: Principal,
    pub custody: Principal,
    pub governance: Principal,
    pub yields: Principal,
}

impl CanisterIds {
    /// Parse the configured canister ids.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed id.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let parse = |field: &'static str, text: &str| {
            Principal::from_text(text).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })
        };
        let canisters = &config.canisters;
        Ok(Self {
            core: parse("canisters.core", &canisters.core)?,
            custody: parse("canisters.custody", &canisters.custody)?,
            governance: parse("canisters.governance", &canisters.governance)?,
            yields: parse("canisters.yield", &canisters.yields)?,
        })
    }
}

pub struct IcConnector {
    host: String,
    /// Local replicas sign with a development root key that must be fetched.
    fetch_root_key: bool,
    canisters: CanisterIds,
}

impl IcConnector {
    pub fn new(host: impl Into<String>, fetch_root_key: bool, canisters: CanisterIds) -> Self {
        Self {
            host: host.into(),
            fetch_root_key,
            canisters,
        }
    }

    /// # Errors
    ///
    /// Returns an error if a canister id is malformed.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.host(),
            config.environment.is_local(),
            CanisterIds::from_config(config)?,
        ))
    }
}

#[async_trait]
impl ActorConnector for IcConnector {
    async fn connect(&self, credential: Option<&Credential>) -> CallResult<ActorSet> {
        let identity: Box<dyn Identity> = match credential {
            Some(credential) => identity_from_pem(credential.key_material())
                .map_err(|e| GatewayError::transport("connect", e))?,
            None => Box::new(AnonymousIdentity),
        };

        let agent = Agent::builder()
            .with_url(self.host.as_str())
            .with_boxed_identity(identity)
            .build()
            .map_err(|e| GatewayError::transport("connect", e))?;

        if self.fetch_root_key {
            debug!(host = %self.host, "Fetching root key");
            agent
                .fetch_root_key()
                .await
                .map_err(|e| GatewayError::transport("fetch_root_key", e))?;
        }

        info!(
            host = %self.host,
            anonymous = credential.is_none(),
            "Actors created"
        );
        let agent = Arc::new(agent);
        let canister = |id| Canister::new(Arc::clone(&agent), id);
        Ok(ActorSet {
            core: Arc::new(CoreCanister(canister(self.canisters.core))),
            custody: Arc::new(CustodyCanister(canister(self.canisters.custody))),
            governance: Arc::new(GovernanceCanister(canister(self.canisters.governance))),
            yields: Arc::new(YieldCanister(canister(self.canisters.yields))),
        })
    }
}
