//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │ Session · Gateway · Agg │
//!                    └─────────────────────────┘
//!                         │               │
//!                         ▼               ▼
//!                  ┌─────────────┐  ┌───────────┐
//!                  │   Actors    │  │ Identity  │
//!                  │   Adapter   │  │ Provider  │
//!                  └─────────────┘  └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`CoreActor`], [`CustodyActor`], [`GovernanceActor`], [`YieldActor`] - Remote services
//! - [`ActorConnector`] - Builds identity-bound or anonymous actor sets
//! - [`IdentityProvider`] - Interactive sign-in and session restore

pub mod outbound;

pub use outbound::actor::{
    ActorConnector, ActorSet, CallResult, CoreActor, CustodyActor, GovernanceActor, YieldActor,
};
pub use outbound::identity::IdentityProvider;
