//! Nuru - client SDK and CLI for Nuru Finance on the Internet Computer.
//!
//! Nuru Finance lets users save Bitcoin in individual or group pools, stake
//! into yield strategies, lock fixed-term investments and vote on protocol
//! proposals. The backend is four canisters; this crate is the client side.
//!
//! # Architecture
//!
//! - **`application::session`** - identity lifecycle on top of an
//!   [`port::IdentityProvider`]
//! - **`application::gateway`** - typed access to the four remote services,
//!   with neutral fallbacks for reads and timeouts for every call
//! - **`application::aggregator`** - the observable application state:
//!   collections, busy flag, error slot and post-action refetches
//! - **`adapter::inbound::cli`** - the `nuru` command line
//! - **`adapter::outbound::ic`** - `ic-agent` actors and the Candid codec
//!   (requires the `ic` feature)
//!
//! # Modules
//!
//! - [`domain`] - transport-agnostic entities and amounts
//! - [`port`] - traits the application depends on
//! - [`application`] - session manager, gateway and aggregator
//! - [`adapter`] - CLI and outbound adapters
//! - [`infrastructure`] - configuration, logging and wiring
//! - [`error`] - error types for the crate
//!
//! # Features
//!
//! - `ic` (default) - Internet Computer transport
//! - `testkit` - scripted actors and identity providers for tests
//!
//! # Example
//!
//! ```no_run
//! use nuru::infrastructure::bootstrap::build_client;
//! use nuru::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> nuru::error::Result<()> {
//! let config = Config::load("nuru.toml")?;
//! let client = build_client(&config)?;
//! client.start().await?;
//! println!("{} pools", client.aggregator().snapshot().pools.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
