//! Remote actor ports for the four backend services.
//!
//! Each trait mirrors one service's method surface. Implementations decode
//! the wire format into domain types and report tagged remote results as
//! [`Reply`]; they do not apply any fallback policy. Faults that prevent a
//! call from completing are returned as [`GatewayError::Transport`].

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    Btc, Credential, Investment, NewPool, NewProposal, PoolId, PrincipalId, Proposal, ProposalId,
    Reply, SavingsPool, StrategyId, UserPosition, UserProfile, VoteChoice, WalletInfo,
    YieldStrategy,
};
use crate::error::GatewayError;

/// Result of a single remote round trip.
pub type CallResult<T> = Result<T, GatewayError>;

/// Core ledger service: users, savings pools, investments.
#[async_trait]
pub trait CoreActor: Send + Sync {
    async fn register_user(&self) -> CallResult<Reply<String>>;

    async fn get_user_profile(&self) -> CallResult<Reply<UserProfile>>;

    async fn get_all_active_pools(&self) -> CallResult<Vec<SavingsPool>>;

    async fn create_savings_pool(&self, pool: &NewPool) -> CallResult<Reply<PoolId>>;

    async fn join_pool(&self, pool: PoolId) -> CallResult<Reply<()>>;

    async fn deposit_to_pool(&self, pool: PoolId, amount: Btc) -> CallResult<Reply<()>>;

    async fn start_investment(&self, amount: Btc, duration_days: u64) -> CallResult<Reply<()>>;

    async fn get_user_investments(&self, user: &PrincipalId) -> CallResult<Vec<Investment>>;
}

/// Custody service: deposit wallet and balance. Amounts are satoshis.
#[async_trait]
pub trait CustodyActor: Send + Sync {
    async fn get_wallet_info(&self) -> CallResult<Reply<WalletInfo>>;

    async fn get_balance(&self) -> CallResult<Reply<u64>>;

    /// Returns the new deposit address.
    async fn create_wallet(&self) -> CallResult<Reply<String>>;

    async fn transfer_to_savings(&self, sats: u64, pool: PoolId) -> CallResult<Reply<()>>;

    async fn simulate_deposit(&self, sats: u64) -> CallResult<Reply<()>>;
}

/// Governance service.
#[async_trait]
pub trait GovernanceActor: Send + Sync {
    async fn get_active_proposals(&self) -> CallResult<Vec<Proposal>>;

    async fn get_proposal(&self, id: ProposalId) -> CallResult<Reply<Proposal>>;

    async fn vote(&self, id: ProposalId, choice: VoteChoice) -> CallResult<Reply<()>>;

    async fn create_proposal(&self, proposal: &NewProposal) -> CallResult<Reply<()>>;
}

/// Yield service.
#[async_trait]
pub trait YieldActor: Send + Sync {
    async fn get_available_strategies(&self) -> CallResult<Vec<YieldStrategy>>;

    async fn enter_position(&self, strategy: &StrategyId, amount: Btc) -> CallResult<Reply<()>>;

    async fn get_user_positions(&self) -> CallResult<Vec<UserPosition>>;

    async fn calculate_current_yield(&self) -> CallResult<Reply<Btc>>;

    /// Returns the amount claimed.
    async fn claim_yields(&self) -> CallResult<Reply<Btc>>;

    async fn project_returns(
        &self,
        amount: Btc,
        strategy: &StrategyId,
        duration_days: u64,
    ) -> CallResult<Reply<Btc>>;

    async fn get_strategy_performance(&self, strategy: &StrategyId) -> CallResult<Reply<Decimal>>;
}

/// Handles to all four services, bound to one identity.
#[derive(Clone)]
pub struct ActorSet {
    pub core: Arc<dyn CoreActor>,
    pub custody: Arc<dyn CustodyActor>,
    pub governance: Arc<dyn GovernanceActor>,
    pub yields: Arc<dyn YieldActor>,
}

/// Builds actor sets for a credential, or anonymous ones for public reads.
#[async_trait]
pub trait ActorConnector: Send + Sync {
    async fn connect(&self, credential: Option<&Credential>) -> CallResult<ActorSet>;
}
