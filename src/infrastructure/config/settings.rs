//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct. Configuration is loaded from a TOML
//! file; environment variables written by `dfx` (`DFX_NETWORK`,
//! `CANISTER_ID_*`) and `NURU_IDENTITY_PEM` override the file.
//!
//! # Example
//!
//! ```no_run
//! use nuru::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::identity::IdentityConfig;
use super::logging::LoggingConfig;
use super::network::{CanisterConfig, Environment, NetworkConfig};
use crate::error::{ConfigError, Result};

const ENV_NETWORK: &str = "DFX_NETWORK";
const ENV_CORE: &str = "CANISTER_ID_NURU_BACKEND";
const ENV_CUSTODY: &str = "CANISTER_ID_CANISTER_TWO";
const ENV_GOVERNANCE: &str = "CANISTER_ID_CANISTER_THREE";
const ENV_YIELD: &str = "CANISTER_ID_CANISTER_FOUR";
const ENV_IDENTITY_PEM: &str = "NURU_IDENTITY_PEM";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Local replica or mainnet. Defaults to local.
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub network: NetworkConfig,

    /// Backend canister ids. All four are required.
    #[serde(default)]
    pub canisters: CanisterConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration with a custom environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml_with(
        content: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` when it exists, otherwise build the configuration from the
    /// environment alone.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_or_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(network) = env(ENV_NETWORK) {
            self.environment =
                Environment::from_dfx_network(&network).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        field: ENV_NETWORK,
                        reason: format!("expected 'local' or 'ic', got '{network}'"),
                    }
                })?;
        }

        let canisters = &mut self.canisters;
        for (key, slot) in [
            (ENV_CORE, &mut canisters.core),
            (ENV_CUSTODY, &mut canisters.custody),
            (ENV_GOVERNANCE, &mut canisters.governance),
            (ENV_YIELD, &mut canisters.yields),
        ] {
            if let Some(id) = env(key).filter(|id| !id.trim().is_empty()) {
                *slot = id;
            }
        }

        if let Some(pem) = env(ENV_IDENTITY_PEM).filter(|p| !p.trim().is_empty()) {
            self.identity.pem_path = Some(PathBuf::from(pem));
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(field) = self.canisters.missing() {
            return Err(ConfigError::MissingField { field }.into());
        }
        if self.network.call_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "call_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        for (field, value) in [
            ("network.host", self.host()),
            ("network.identity_provider", self.identity_provider()),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Replica URL for the active environment.
    #[must_use]
    pub fn host(&self) -> &str {
        self.network.host(self.environment)
    }

    /// Identity provider URL for the active environment.
    #[must_use]
    pub fn identity_provider(&self) -> &str {
        self.network.identity_provider(self.environment)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
