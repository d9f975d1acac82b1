//! Transport-agnostic domain types: identifiers, amounts and the entities
//! mirrored from the remote services.
//!
//! Nothing here performs I/O. Entities are plain snapshots; the aggregator
//! replaces them wholesale on every refresh.

pub mod credential;
pub mod deadline;
pub mod id;
pub mod investment;
pub mod money;
pub mod pool;
pub mod portfolio;
pub mod profile;
pub mod proposal;
pub mod reply;
pub mod wallet;
pub mod yields;

pub use credential::Credential;
pub use id::{PoolId, PrincipalId, ProposalId, StrategyId};
pub use investment::Investment;
pub use money::Btc;
pub use pool::{NewPool, PoolKind, SavingsPool};
pub use portfolio::PortfolioSummary;
pub use profile::{UserProfile, UserState};
pub use proposal::{NewProposal, Proposal, ProposalKind, ProposalStatus, VoteChoice};
pub use reply::Reply;
pub use wallet::WalletInfo;
pub use yields::{RiskTier, UserPosition, YieldStrategy};
