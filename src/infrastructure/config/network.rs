//! Network and canister configuration.

use std::time::Duration;

use serde::Deserialize;

pub const LOCAL_HOST: &str = "http://localhost:4943";
pub const MAINNET_HOST: &str = "https://ic0.app";
pub const LOCAL_IDENTITY_PROVIDER: &str = "http://umunu-kh777-77774-qaaca-cai.localhost:4943/";
pub const MAINNET_IDENTITY_PROVIDER: &str = "https://identity.ic0.app";

/// Deployment target (local replica vs mainnet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    #[serde(alias = "ic")]
    Mainnet,
}

impl Environment {
    /// Parse a `DFX_NETWORK` value.
    #[must_use]
    pub fn from_dfx_network(value: &str) -> Option<Self> {
        match value.trim() {
            "local" => Some(Self::Local),
            "ic" | "mainnet" => Some(Self::Mainnet),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Replica connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Replica URL. Defaults to the environment's well-known host.
    #[serde(default)]
    pub host: Option<String>,
    /// Identity provider URL shown during sign-in.
    #[serde(default)]
    pub identity_provider: Option<String>,
    /// Upper bound for a single remote call.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

const fn default_call_timeout_ms() -> u64 {
    30_000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: None,
            identity_provider: None,
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn host(&self, environment: Environment) -> &str {
        self.host.as_deref().unwrap_or(match environment {
            Environment::Local => LOCAL_HOST,
            Environment::Mainnet => MAINNET_HOST,
        })
    }

    #[must_use]
    pub fn identity_provider(&self, environment: Environment) -> &str {
        self.identity_provider
            .as_deref()
            .unwrap_or(match environment {
                Environment::Local => LOCAL_IDENTITY_PROVIDER,
                Environment::Mainnet => MAINNET_IDENTITY_PROVIDER,
            })
    }

    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

/// Ids of the four backend canisters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanisterConfig {
    /// Core ledger: users, pools, investments.
    #[serde(default)]
    pub core: String,
    #[serde(default)]
    pub custody: String,
    #[serde(default)]
    pub governance: String,
    #[serde(default, rename = "yield")]
    pub yields: String,
}

impl CanisterConfig {
    /// First unset canister id, by config key.
    #[must_use]
    pub fn missing(&self) -> Option<&'static str> {
        [
            ("canisters.core", &self.core),
            ("canisters.custody", &self.custody),
            ("canisters.governance", &self.governance),
            ("canisters.yield", &self.yields),
        ]
        .into_iter()
        .find(|(_, id)| id.trim().is_empty())
        .map(|(field, _)| field)
    }
}
