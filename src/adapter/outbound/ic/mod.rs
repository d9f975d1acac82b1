//! Internet Computer transport: Candid over `ic-agent`.

pub mod canister;
pub mod connector;
pub mod dto;
pub mod identity;

pub use connector::{CanisterIds, IcConnector};
