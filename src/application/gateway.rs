//! Remote service gateway.
//!
//! Translates typed calls into actor invocations and applies one policy to
//! every result:
//!
//! - **Reads** come in two forms. `try_*` methods return transport faults as
//!   errors so callers can tell "failed" from "empty"; the plain methods log
//!   the fault and return a neutral value (empty, zero, `None`). A tagged
//!   remote failure on a read yields the same neutral sentinel.
//! - **Writes** return [`GatewayError`], carrying the remote message verbatim
//!   in [`GatewayError::Remote`].
//!
//! Identity-bound calls fail with [`GatewayError::NotInitialized`] until
//! [`Gateway::initialize`] installs a credential. Public reads fall back to
//! an anonymous actor set. Every call is bounded by the configured timeout;
//! there are no retries and no caching.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::money::{btc_to_sats, sats_to_btc};
use crate::domain::{
    Btc, Credential, Investment, NewPool, NewProposal, PoolId, PrincipalId, Proposal, ProposalId,
    Reply, SavingsPool, StrategyId, UserPosition, UserProfile, VoteChoice, WalletInfo,
    YieldStrategy,
};
use crate::error::GatewayError;
use crate::port::{ActorConnector, ActorSet, CallResult};

pub struct Gateway {
    connector: Arc<dyn ActorConnector>,
    timeout: Duration,
    anonymous: OnceCell<ActorSet>,
    bound: RwLock<Option<ActorSet>>,
}

impl Gateway {
    #[must_use]
    pub fn new(connector: Arc<dyn ActorConnector>, timeout: Duration) -> Self {
        Self {
            connector,
            timeout,
            anonymous: OnceCell::new(),
            bound: RwLock::new(None),
        }
    }

    /// Bind identity-bound calls to `credential`.
    pub async fn initialize(&self, credential: &Credential) -> CallResult<()> {
        let actors = self.connector.connect(Some(credential)).await?;
        *self.bound.write() = Some(actors);
        info!(principal = %credential.principal(), "Gateway initialized");
        Ok(())
    }

    /// Drop the identity-bound actors. Public reads keep working.
    pub fn reset(&self) {
        if self.bound.write().take().is_some() {
            debug!("Gateway reset");
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.bound.read().is_some()
    }

    fn bound(&self) -> CallResult<ActorSet> {
        let bound = self.bound.read().clone();
        bound.ok_or(GatewayError::NotInitialized)
    }

    async fn public(&self) -> CallResult<ActorSet> {
        let bound = self.bound.read().clone();
        if let Some(actors) = bound {
            return Ok(actors);
        }
        self.anonymous
            .get_or_try_init(|| self.connector.connect(None))
            .await
            .cloned()
    }

    async fn call<T>(
        &self,
        method: &'static str,
        fut: impl Future<Output = CallResult<T>>,
    ) -> CallResult<T> {
        debug!(method, "Remote call");
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout {
                method,
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    // ---- core service -------------------------------------------------

    /// Register the signed-in principal. Returns the remote confirmation.
    pub async fn register_user(&self) -> CallResult<String> {
        let actors = self.bound()?;
        write(
            "registerUser",
            self.call("registerUser", actors.core.register_user()).await,
        )
    }

    /// Profile of the bound principal, `None` when unregistered.
    pub async fn try_user_profile(&self) -> CallResult<Option<UserProfile>> {
        let actors = self.bound()?;
        let reply = self
            .call("getUserProfile", actors.core.get_user_profile())
            .await?;
        Ok(sentinel("getUserProfile", reply))
    }

    pub async fn user_profile(&self) -> Option<UserProfile> {
        neutral("getUserProfile", self.try_user_profile().await)
    }

    /// Active pools. Public read.
    pub async fn try_active_pools(&self) -> CallResult<Vec<SavingsPool>> {
        let actors = self.public().await?;
        self.call("getAllActivePools", actors.core.get_all_active_pools())
            .await
    }

    pub async fn active_pools(&self) -> Vec<SavingsPool> {
        neutral("getAllActivePools", self.try_active_pools().await)
    }

    /// Create a pool. Returns the new id.
    pub async fn create_savings_pool(&self, pool: &NewPool) -> CallResult<PoolId> {
        let actors = self.bound()?;
        write(
            "createSavingsPool",
            self.call("createSavingsPool", actors.core.create_savings_pool(pool))
                .await,
        )
    }

    /// Join a group pool as the bound principal.
    pub async fn join_pool(&self, pool: PoolId) -> CallResult<()> {
        let actors = self.bound()?;
        write(
            "joinPool",
            self.call("joinPool", actors.core.join_pool(pool)).await,
        )
    }

    /// Deposit `amount` BTC into a pool.
    pub async fn deposit_to_pool(&self, pool: PoolId, amount: Btc) -> CallResult<()> {
        let actors = self.bound()?;
        write(
            "depositToPool",
            self.call("depositToPool", actors.core.deposit_to_pool(pool, amount))
                .await,
        )
    }

    /// Lock `amount` BTC for a fixed term.
    pub async fn start_investment(&self, amount: Btc, duration_days: u64) -> CallResult<()> {
        let actors = self.bound()?;
        write(
            "startInvestment",
            self.call(
                "startInvestment",
                actors.core.start_investment(amount, duration_days),
            )
            .await,
        )
    }

    /// Investments held by `user`.
    pub async fn try_user_investments(&self, user: &PrincipalId) -> CallResult<Vec<Investment>> {
        let actors = self.bound()?;
        self.call("getUserInvestments", actors.core.get_user_investments(user))
            .await
    }

    pub async fn user_investments(&self, user: &PrincipalId) -> Vec<Investment> {
        neutral("getUserInvestments", self.try_user_investments(user).await)
    }

    // ---- custody service ----------------------------------------------

    /// Custody wallet, `None` when none was created.
    pub async fn try_wallet_info(&self) -> CallResult<Option<WalletInfo>> {
        let actors = self.bound()?;
        let reply = self
            .call("getWalletInfo", actors.custody.get_wallet_info())
            .await?;
        Ok(sentinel("getWalletInfo", reply))
    }

    pub async fn wallet_info(&self) -> Option<WalletInfo> {
        neutral("getWalletInfo", self.try_wallet_info().await)
    }

    /// Custody balance in BTC.
    pub async fn try_balance(&self) -> CallResult<Btc> {
        let actors = self.bound()?;
        let reply = self.call("getBalance", actors.custody.get_balance()).await?;
        Ok(sentinel("getBalance", reply).map_or(Decimal::ZERO, sats_to_btc))
    }

    pub async fn balance(&self) -> Btc {
        neutral("getBalance", self.try_balance().await)
    }

    /// Create the custody wallet. Returns its deposit address.
    pub async fn create_wallet(&self) -> CallResult<String> {
        let actors = self.bound()?;
        write(
            "createWallet",
            self.call("createWallet", actors.custody.create_wallet()).await,
        )
    }

    /// Move `amount` BTC from the custody wallet into a pool.
    pub async fn transfer_to_savings(&self, amount: Btc, pool: PoolId) -> CallResult<()> {
        let actors = self.bound()?;
        let sats = sats_arg(amount)?;
        write(
            "transferToSavings",
            self.call(
                "transferToSavings",
                actors.custody.transfer_to_savings(sats, pool),
            )
            .await,
        )
    }

    /// Credit test funds to the custody wallet (local networks only).
    pub async fn simulate_deposit(&self, amount: Btc) -> CallResult<()> {
        let actors = self.bound()?;
        let sats = sats_arg(amount)?;
        write(
            "simulateDeposit",
            self.call("simulateDeposit", actors.custody.simulate_deposit(sats))
                .await,
        )
    }

    // ---- governance service -------------------------------------------

    /// Active proposals. Public read.
    pub async fn try_active_proposals(&self) -> CallResult<Vec<Proposal>> {
        let actors = self.public().await?;
        self.call(
            "getActiveProposals",
            actors.governance.get_active_proposals(),
        )
        .await
    }

    pub async fn active_proposals(&self) -> Vec<Proposal> {
        neutral("getActiveProposals", self.try_active_proposals().await)
    }

    /// One proposal, `None` when the id is unknown.
    pub async fn try_proposal(&self, id: ProposalId) -> CallResult<Option<Proposal>> {
        let actors = self.public().await?;
        let reply = self
            .call("getProposal", actors.governance.get_proposal(id))
            .await?;
        Ok(sentinel("getProposal", reply))
    }

    pub async fn proposal(&self, id: ProposalId) -> Option<Proposal> {
        neutral("getProposal", self.try_proposal(id).await)
    }

    /// Vote on a proposal.
    pub async fn vote(&self, id: ProposalId, choice: VoteChoice) -> CallResult<()> {
        let actors = self.bound()?;
        write(
            "vote",
            self.call("vote", actors.governance.vote(id, choice)).await,
        )
    }

    /// Submit a governance proposal.
    pub async fn create_proposal(&self, proposal: &NewProposal) -> CallResult<()> {
        let actors = self.bound()?;
        write(
            "createProposal",
            self.call(
                "createProposal",
                actors.governance.create_proposal(proposal),
            )
            .await,
        )
    }

    // ---- yield service ------------------------------------------------

    /// Available strategies. Public read.
    pub async fn try_strategies(&self) -> CallResult<Vec<YieldStrategy>> {
        let actors = self.public().await?;
        self.call(
            "getAvailableStrategies",
            actors.yields.get_available_strategies(),
        )
        .await
    }

    pub async fn strategies(&self) -> Vec<YieldStrategy> {
        neutral("getAvailableStrategies", self.try_strategies().await)
    }

    /// Stake `amount` BTC into a strategy.
    pub async fn enter_position(&self, strategy: &StrategyId, amount: Btc) -> CallResult<()> {
        let actors = self.bound()?;
        write(
            "enterPosition",
            self.call("enterPosition", actors.yields.enter_position(strategy, amount))
                .await,
        )
    }

    /// Positions of the bound principal.
    pub async fn try_user_positions(&self) -> CallResult<Vec<UserPosition>> {
        let actors = self.bound()?;
        self.call("getUserPositions", actors.yields.get_user_positions())
            .await
    }

    pub async fn user_positions(&self) -> Vec<UserPosition> {
        neutral("getUserPositions", self.try_user_positions().await)
    }

    /// Yield accrued so far.
    pub async fn try_current_yield(&self) -> CallResult<Btc> {
        let actors = self.bound()?;
        let reply = self
            .call(
                "calculateCurrentYield",
                actors.yields.calculate_current_yield(),
            )
            .await?;
        Ok(sentinel("calculateCurrentYield", reply).unwrap_or_default())
    }

    /// Yield accrued but not yet claimed. Zero on any failure.
    pub async fn current_yield(&self) -> Btc {
        neutral("calculateCurrentYield", self.try_current_yield().await)
    }

    /// Claim accrued yield. Returns the amount claimed.
    pub async fn claim_yields(&self) -> CallResult<Btc> {
        let actors = self.bound()?;
        write(
            "claimYields",
            self.call("claimYields", actors.yields.claim_yields()).await,
        )
    }

    /// Projected return. Public read.
    pub async fn try_project_returns(
        &self,
        amount: Btc,
        strategy: &StrategyId,
        duration_days: u64,
    ) -> CallResult<Btc> {
        let actors = self.public().await?;
        let reply = self
            .call(
                "projectReturns",
                actors
                    .yields
                    .project_returns(amount, strategy, duration_days),
            )
            .await?;
        Ok(sentinel("projectReturns", reply).unwrap_or_default())
    }

    /// Projected return for staking `amount` for `duration_days`. Zero on failure.
    pub async fn project_returns(
        &self,
        amount: Btc,
        strategy: &StrategyId,
        duration_days: u64,
    ) -> Btc {
        neutral(
            "projectReturns",
            self.try_project_returns(amount, strategy, duration_days)
                .await,
        )
    }

    /// Historical APY. Public read.
    pub async fn try_strategy_performance(&self, strategy: &StrategyId) -> CallResult<Decimal> {
        let actors = self.public().await?;
        let reply = self
            .call(
                "getStrategyPerformance",
                actors.yields.get_strategy_performance(strategy),
            )
            .await?;
        Ok(sentinel("getStrategyPerformance", reply).unwrap_or_default())
    }

    /// Recent realized APY of a strategy. Zero on failure.
    pub async fn strategy_performance(&self, strategy: &StrategyId) -> Decimal {
        neutral(
            "getStrategyPerformance",
            self.try_strategy_performance(strategy).await,
        )
    }
}

/// Unwrap a tagged read result, turning a remote failure into `None`.
fn sentinel<T>(method: &'static str, reply: Reply<T>) -> Option<T> {
    match reply {
        Reply::Ok(value) => Some(value),
        Reply::Err(message) => {
            debug!(method, message = %message, "Remote reported failure on read");
            None
        }
    }
}

/// Swallow a read fault into the neutral value.
fn neutral<T: Default>(method: &'static str, result: CallResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(method, error = %err, "Read failed, using neutral value");
        T::default()
    })
}

/// Flatten a write's transport and remote outcome into one error channel.
fn write<T>(method: &'static str, result: CallResult<Reply<T>>) -> CallResult<T> {
    let outcome = result.and_then(Reply::into_result);
    if let Err(err) = &outcome {
        warn!(method, kind = %err.kind(), error = %err, "Write failed");
    }
    outcome
}

/// Convert a BTC argument to the satoshi count the custody service takes.
fn sats_arg(amount: Btc) -> CallResult<u64> {
    btc_to_sats(amount).ok_or_else(|| {
        GatewayError::InvalidArgument(format!("Amount {amount} BTC is out of range"))
    })
}
