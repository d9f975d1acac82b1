//! Actor implementations over `ic-agent`.
//!
//! Reads are query calls, writes are update calls awaited until the
//! certified reply is available.

use std::sync::Arc;

use async_trait::async_trait;
use candid::utils::ArgumentEncoder;
use candid::{CandidType, Int, Nat, Principal, Reserved};
use ic_agent::Agent;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    convert_all, nat_u64, WireInvestment, WirePool, WirePoolType, WirePosition, WireProposal,
    WireProposalType, WireResult, WireStrategy, WireUser, WireVote, WireWallet,
};
use crate::domain::deadline::to_nanos;
use crate::domain::money::{from_f64, to_f64};
use crate::domain::{
    Btc, Investment, NewPool, NewProposal, PoolId, PrincipalId, Proposal, ProposalId, Reply,
    SavingsPool, StrategyId, UserPosition, UserProfile, VoteChoice, WalletInfo, YieldStrategy,
};
use crate::error::GatewayError;
use crate::port::{CallResult, CoreActor, CustodyActor, GovernanceActor, YieldActor};

/// One canister reached through a shared agent.
#[derive(Clone)]
pub struct Canister {
    agent: Arc<Agent>,
    id: Principal,
}

impl Canister {
    pub fn new(agent: Arc<Agent>, id: Principal) -> Self {
        Self { agent, id }
    }

    async fn query<A, R>(&self, method: &'static str, args: A) -> CallResult<R>
    where
        A: ArgumentEncoder + Send,
        R: CandidType + DeserializeOwned,
    {
        let arg = candid::encode_args(args).map_err(|e| GatewayError::transport(method, e))?;
        debug!(canister = %self.id, method, "query");
        let bytes = self
            .agent
            .query(&self.id, method)
            .with_arg(arg)
            .call()
            .await
            .map_err(|e| GatewayError::transport(method, e))?;
        candid::decode_one(&bytes).map_err(|e| GatewayError::transport(method, e))
    }

    async fn update<A, R>(&self, method: &'static str, args: A) -> CallResult<R>
    where
        A: ArgumentEncoder + Send,
        R: CandidType + DeserializeOwned,
    {
        let arg = candid::encode_args(args).map_err(|e| GatewayError::transport(method, e))?;
        debug!(canister = %self.id, method, "update");
        let bytes = self
            .agent
            .update(&self.id, method)
            .with_arg(arg)
            .call_and_wait()
            .await
            .map_err(|e| GatewayError::transport(method, e))?;
        candid::decode_one(&bytes).map_err(|e| GatewayError::transport(method, e))
    }
}

fn decode<T>(method: &'static str, result: Result<T, String>) -> CallResult<T> {
    result.map_err(|e| GatewayError::transport(method, e))
}

/// Result whose success payload carries nothing the client uses.
fn unit(result: WireResult<Reserved>) -> Reply<()> {
    match result {
        WireResult::Ok(_) => Reply::Ok(()),
        WireResult::Err(message) => Reply::Err(message),
    }
}

fn float(result: WireResult<f64>) -> Reply<Decimal> {
    match result {
        WireResult::Ok(value) => Reply::Ok(from_f64(value)),
        WireResult::Err(message) => Reply::Err(message),
    }
}

fn principal_arg(method: &'static str, user: &PrincipalId) -> CallResult<Principal> {
    Principal::from_text(user.as_str()).map_err(|e| GatewayError::transport(method, e))
}

pub struct CoreCanister(pub Canister);

#[async_trait]
impl CoreActor for CoreCanister {
    async fn register_user(&self) -> CallResult<Reply<String>> {
        let result: WireResult<String> = self.0.update("registerUser", ()).await?;
        decode("registerUser", result.into_reply(Ok))
    }

    async fn get_user_profile(&self) -> CallResult<Reply<UserProfile>> {
        let result: WireResult<WireUser> = self.0.query("getUserProfile", ()).await?;
        decode("getUserProfile", result.into_reply(UserProfile::try_from))
    }

    async fn get_all_active_pools(&self) -> CallResult<Vec<SavingsPool>> {
        let pools: Vec<WirePool> = self.0.query("getAllActivePools", ()).await?;
        decode("getAllActivePools", convert_all(pools))
    }

    async fn create_savings_pool(&self, pool: &NewPool) -> CallResult<Reply<PoolId>> {
        let args = (
            pool.name.clone(),
            to_f64(pool.target_amount),
            Int::from(to_nanos(pool.deadline)),
            WirePoolType::from(pool.kind),
        );
        let result: WireResult<Nat> = self.0.update("createSavingsPool", args).await?;
        decode(
            "createSavingsPool",
            result.into_reply(|id| nat_u64(&id).map(PoolId::new)),
        )
    }

    async fn join_pool(&self, pool: PoolId) -> CallResult<Reply<()>> {
        let result = self.0.update("joinPool", (Nat::from(pool.value()),)).await?;
        Ok(unit(result))
    }

    async fn deposit_to_pool(&self, pool: PoolId, amount: Btc) -> CallResult<Reply<()>> {
        let args = (Nat::from(pool.value()), to_f64(amount));
        let result = self.0.update("depositToPool", args).await?;
        Ok(unit(result))
    }

    async fn start_investment(&self, amount: Btc, duration_days: u64) -> CallResult<Reply<()>> {
        let args = (to_f64(amount), Int::from(duration_days));
        let result = self.0.update("startInvestment", args).await?;
        Ok(unit(result))
    }

    async fn get_user_investments(&self, user: &PrincipalId) -> CallResult<Vec<Investment>> {
        let user = principal_arg("getUserInvestments", user)?;
        let investments: Vec<WireInvestment> =
            self.0.query("getUserInvestments", (user,)).await?;
        decode("getUserInvestments", convert_all(investments))
    }
}

pub struct CustodyCanister(pub Canister);

#[async_trait]
impl CustodyActor for CustodyCanister {
    async fn get_wallet_info(&self) -> CallResult<Reply<WalletInfo>> {
        let result: WireResult<WireWallet> = self.0.query("getWalletInfo", ()).await?;
        decode("getWalletInfo", result.into_reply(WalletInfo::try_from))
    }

    async fn get_balance(&self) -> CallResult<Reply<u64>> {
        let result: WireResult<Nat> = self.0.query("getBalance", ()).await?;
        decode("getBalance", result.into_reply(|sats| nat_u64(&sats)))
    }

    async fn create_wallet(&self) -> CallResult<Reply<String>> {
        let result: WireResult<String> = self.0.update("createWallet", ()).await?;
        decode("createWallet", result.into_reply(Ok))
    }

    async fn transfer_to_savings(&self, sats: u64, pool: PoolId) -> CallResult<Reply<()>> {
        let args = (Nat::from(sats), Nat::from(pool.value()));
        let result = self.0.update("transferToSavings", args).await?;
        Ok(unit(result))
    }

    async fn simulate_deposit(&self, sats: u64) -> CallResult<Reply<()>> {
        let result = self.0.update("simulateDeposit", (Nat::from(sats),)).await?;
        Ok(unit(result))
    }
}

pub struct GovernanceCanister(pub Canister);

#[async_trait]
impl GovernanceActor for GovernanceCanister {
    async fn get_active_proposals(&self) -> CallResult<Vec<Proposal>> {
        let proposals: Vec<WireProposal> = self.0.query("getActiveProposals", ()).await?;
        decode("getActiveProposals", convert_all(proposals))
    }

    async fn get_proposal(&self, id: ProposalId) -> CallResult<Reply<Proposal>> {
        let result: WireResult<WireProposal> = self
            .0
            .query("getProposal", (Nat::from(id.value()),))
            .await?;
        decode("getProposal", result.into_reply(Proposal::try_from))
    }

    async fn vote(&self, id: ProposalId, choice: VoteChoice) -> CallResult<Reply<()>> {
        let args = (Nat::from(id.value()), WireVote::from(choice));
        let result = self.0.update("vote", args).await?;
        Ok(unit(result))
    }

    async fn create_proposal(&self, proposal: &NewProposal) -> CallResult<Reply<()>> {
        let args = (
            proposal.title.clone(),
            proposal.description.clone(),
            WireProposalType::from(proposal.kind),
        );
        let result = self.0.update("createProposal", args).await?;
        Ok(unit(result))
    }
}

pub struct YieldCanister(pub Canister);

#[async_trait]
impl YieldActor for YieldCanister {
    async fn get_available_strategies(&self) -> CallResult<Vec<YieldStrategy>> {
        let strategies: Vec<WireStrategy> = self.0.query("getAvailableStrategies", ()).await?;
        Ok(strategies.into_iter().map(YieldStrategy::from).collect())
    }

    async fn enter_position(&self, strategy: &StrategyId, amount: Btc) -> CallResult<Reply<()>> {
        let args = (strategy.as_str().to_string(), to_f64(amount));
        let result = self.0.update("enterPosition", args).await?;
        Ok(unit(result))
    }

    async fn get_user_positions(&self) -> CallResult<Vec<UserPosition>> {
        let positions: Vec<WirePosition> = self.0.query("getUserPositions", ()).await?;
        decode("getUserPositions", convert_all(positions))
    }

    async fn calculate_current_yield(&self) -> CallResult<Reply<Btc>> {
        let result = self.0.query("calculateCurrentYield", ()).await?;
        Ok(float(result))
    }

    async fn claim_yields(&self) -> CallResult<Reply<Btc>> {
        let result = self.0.update("claimYields", ()).await?;
        Ok(float(result))
    }

    async fn project_returns(
        &self,
        amount: Btc,
        strategy: &StrategyId,
        duration_days: u64,
    ) -> CallResult<Reply<Btc>> {
        let args = (
            to_f64(amount),
            strategy.as_str().to_string(),
            Int::from(duration_days),
        );
        let result = self.0.query("projectReturns", args).await?;
        Ok(float(result))
    }

    async fn get_strategy_performance(&self, strategy: &StrategyId) -> CallResult<Reply<Decimal>> {
        let result = self
            .0
            .query("getStrategyPerformance", (strategy.as_str().to_string(),))
            .await?;
        Ok(float(result))
    }
}
