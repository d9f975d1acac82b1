//! Application state aggregator.
//!
//! Single source of truth for UI-visible domain state. Every mutating
//! action follows the same pattern:
//!
//! 1. claim the action (rejecting a duplicate already in flight), set busy,
//!    clear the error slot;
//! 2. call the gateway;
//! 3. on success re-fetch the collections listed in
//!    [`Action::invalidates`], concurrently;
//! 4. on failure record one message in the error slot;
//! 5. release the claim on every exit path.
//!
//! Actions never return errors. Their boolean (or amount) result plus the
//! error slot tell the caller what happened.
//!
//! Read-only refreshers never touch the busy flag or the error slot. A failed
//! refresh keeps the previous collection and marks it stale.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::gateway::Gateway;
use super::invalidation::{Action, Collection};
use super::state::{AppError, AppSnapshot, BootstrapState, Store};
use crate::domain::{
    Btc, Credential, Investment, NewPool, NewProposal, PoolId, PortfolioSummary, Proposal,
    PrincipalId, ProposalId, SavingsPool, StrategyId, UserPosition, UserProfile, UserState,
    VoteChoice, WalletInfo, YieldStrategy,
};
use crate::error::{ErrorKind, GatewayError};
use crate::port::CallResult;

const NOT_AUTHENTICATED: &str = "User not authenticated. Please connect your wallet first.";
const NO_PRINCIPAL: &str = "No principal available for user registration";
const ALREADY_REGISTERED: &str = "User already registered";
const BOOTSTRAP_FAILED: &str = "Failed to initialize app data";

/// A freshly fetched collection, ready to replace the stored one.
enum Fetched {
    Profile(Option<UserProfile>),
    Balance(Btc),
    Pools(Vec<SavingsPool>),
    Proposals(Vec<Proposal>),
    Strategies(Vec<YieldStrategy>),
    Positions(Vec<UserPosition>),
    Investments(Vec<Investment>),
}

impl Fetched {
    fn apply(self, snapshot: &mut AppSnapshot) {
        match self {
            Self::Profile(profile) => {
                if profile.is_some() {
                    snapshot.user.is_registered = true;
                }
                snapshot.user.profile = profile;
            }
            Self::Balance(balance) => snapshot.user.balance = balance,
            Self::Pools(pools) => snapshot.pools = pools,
            Self::Proposals(proposals) => snapshot.proposals = proposals,
            Self::Strategies(strategies) => snapshot.strategies = strategies,
            Self::Positions(positions) => snapshot.positions = positions,
            Self::Investments(investments) => snapshot.investments = investments,
        }
    }
}

/// Claim on a mutating action. Dropping it clears the action's busy state.
struct InFlight<'a> {
    aggregator: &'a Aggregator,
    action: Action,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut pending = self.aggregator.pending.lock();
        pending.remove(&self.action);
        let busy = !pending.is_empty();
        self.aggregator.store.update(|s| s.busy = busy);
        debug!(action = %self.action, busy, "Action finished");
    }
}

pub struct Aggregator {
    gateway: Arc<Gateway>,
    store: Store,
    /// Actions currently in flight (prevents duplicate submissions).
    pending: Mutex<HashSet<Action>>,
}

impl Aggregator {
    /// Create an aggregator without loading anything.
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            store: Store::new(),
            pending: Mutex::new(HashSet::new()),
        })
    }

    /// Create an aggregator and start loading public data in the background.
    pub fn launch(gateway: Arc<Gateway>) -> (Arc<Self>, JoinHandle<()>) {
        let aggregator = Self::new(gateway);
        let task = {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.bootstrap().await })
        };
        (aggregator, task)
    }

    /// Load proposals, strategies and pools concurrently.
    ///
    /// Any failed fetch sets the error slot; loading still completes.
    pub async fn bootstrap(&self) {
        self.store.update(|s| s.bootstrap = BootstrapState::Loading);

        let results = join_all(Collection::PUBLIC.iter().map(|c| self.refresh(*c))).await;
        if results.iter().any(|ok| !ok) {
            warn!("Initialization error: public data incomplete");
            self.store.update(|s| {
                s.error = Some(AppError::new(ErrorKind::Transport, BOOTSTRAP_FAILED));
            });
        }

        self.store.update(|s| s.bootstrap = BootstrapState::Ready);
        info!("Public data loaded");
    }

    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.store.subscribe()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.store.read(|s| s.busy)
    }

    #[must_use]
    pub fn error(&self) -> Option<AppError> {
        self.store.read(|s| s.error.clone())
    }

    #[must_use]
    pub fn portfolio(&self) -> PortfolioSummary {
        self.store.read(AppSnapshot::portfolio)
    }

    // ---- refreshers ---------------------------------------------------

    /// Re-fetch one collection and replace it wholesale.
    ///
    /// Returns `false` when the fetch failed; the old data is kept and the
    /// collection is marked stale. Identity-bound collections are skipped
    /// while no principal is known.
    pub async fn refresh(&self, collection: Collection) -> bool {
        let principal = self.store.read(|s| s.user.principal.clone());
        if collection.is_identity_bound() && principal.is_none() {
            debug!(%collection, "Skipping refresh without principal");
            return true;
        }

        match self.fetch(collection, principal.as_ref()).await {
            Ok(fetched) => {
                self.store.update(|s| {
                    fetched.apply(s);
                    s.stale.remove(&collection);
                });
                true
            }
            Err(err) => {
                warn!(%collection, error = %err, "Refresh failed, keeping previous data");
                self.store.update(|s| {
                    s.stale.insert(collection);
                });
                false
            }
        }
    }

    async fn fetch(
        &self,
        collection: Collection,
        principal: Option<&PrincipalId>,
    ) -> CallResult<Fetched> {
        let gateway = &self.gateway;
        Ok(match collection {
            Collection::Profile => Fetched::Profile(gateway.try_user_profile().await?),
            Collection::Balance => Fetched::Balance(gateway.try_balance().await?),
            Collection::Pools => Fetched::Pools(gateway.try_active_pools().await?),
            Collection::Proposals => Fetched::Proposals(gateway.try_active_proposals().await?),
            Collection::Strategies => Fetched::Strategies(gateway.try_strategies().await?),
            Collection::Positions => Fetched::Positions(gateway.try_user_positions().await?),
            Collection::Investments => {
                let principal = principal.ok_or(GatewayError::NotInitialized)?;
                Fetched::Investments(gateway.try_user_investments(principal).await?)
            }
        })
    }

    /// Re-fetch active proposals.
    pub async fn refresh_proposals(&self) {
        self.refresh(Collection::Proposals).await;
    }

    /// Re-fetch available yield strategies.
    pub async fn refresh_yield_strategies(&self) {
        self.refresh(Collection::Strategies).await;
    }

    /// Re-fetch active savings pools.
    pub async fn get_all_active_pools(&self) {
        self.refresh(Collection::Pools).await;
    }

    /// Re-fetch the signed-in user's positions.
    pub async fn get_user_positions(&self) {
        self.refresh(Collection::Positions).await;
    }

    /// Re-fetch the custody balance.
    pub async fn get_balance(&self) {
        self.refresh(Collection::Balance).await;
    }

    /// Re-fetch the signed-in user's investments.
    pub async fn refresh_investments(&self) {
        self.refresh(Collection::Investments).await;
    }

    async fn invalidate(&self, action: Action) {
        let collections = action.invalidates();
        debug!(%action, ?collections, "Refreshing invalidated collections");
        join_all(collections.iter().map(|c| self.refresh(*c))).await;
    }

    // ---- action plumbing ----------------------------------------------

    fn begin(&self, action: Action) -> Option<InFlight<'_>> {
        let mut pending = self.pending.lock();
        if !pending.insert(action) {
            drop(pending);
            warn!(%action, "Action already in progress");
            self.record(AppError::precondition(format!(
                "{}: already in progress",
                action.failure_label()
            )));
            return None;
        }
        self.store.update(|s| {
            s.busy = true;
            s.error = None;
        });
        Some(InFlight {
            aggregator: self,
            action,
        })
    }

    fn record(&self, error: AppError) {
        self.store.update(|s| s.error = Some(error));
    }

    fn fail(&self, action: Action, err: &GatewayError) {
        warn!(%action, kind = %err.kind(), error = %err, "Action failed");
        self.record(AppError::new(
            err.kind(),
            format!("{}: {}", action.failure_label(), err),
        ));
    }

    // ---- session ------------------------------------------------------

    /// Load the signed-in user's profile and balance.
    ///
    /// Returns `true` for a registered user. `false` means either the user
    /// must register (authenticated, unregistered) or the lookup failed
    /// (error slot set).
    pub async fn sign_in(&self, credential: &Credential) -> bool {
        let Some(_flight) = self.begin(Action::SignIn) else {
            return false;
        };
        let principal = credential.principal().clone();
        info!(%principal, "Signing in");

        match self.gateway.try_user_profile().await {
            Ok(None) => {
                info!(%principal, "No profile found, registration required");
                self.store.update(|s| {
                    s.user.principal = Some(principal);
                    s.user.is_authenticated = true;
                    s.user.is_registered = false;
                    s.user.profile = None;
                });
                false
            }
            Ok(Some(profile)) => {
                let balance = self.gateway.balance().await;
                self.store.update(|s| {
                    s.user = UserState {
                        profile: Some(profile),
                        balance,
                        is_authenticated: true,
                        is_registered: true,
                        principal: Some(principal),
                    };
                });
                true
            }
            Err(err) => {
                self.fail(Action::SignIn, &err);
                false
            }
        }
    }

    /// Forget the user. Public collections stay.
    pub fn sign_out(&self) {
        self.store.update(|s| {
            s.user = UserState::default();
            s.positions.clear();
            s.investments.clear();
            s.error = None;
            s.stale.retain(|c| !c.is_identity_bound());
        });
        info!("Signed out");
    }

    /// Register the signed-in principal with the core service.
    pub async fn register(&self) -> bool {
        let (principal, authenticated, registered) = self.store.read(|s| {
            (
                s.user.principal.clone(),
                s.user.is_authenticated,
                s.user.is_registered,
            )
        });
        if !authenticated {
            warn!("Registration attempted without authentication");
            self.record(AppError::precondition(NOT_AUTHENTICATED));
            return false;
        }
        if principal.is_none() {
            self.record(AppError::precondition(NO_PRINCIPAL));
            return false;
        }
        if registered {
            self.record(AppError::precondition(ALREADY_REGISTERED));
            return false;
        }

        let Some(_flight) = self.begin(Action::Register) else {
            return false;
        };
        match self.gateway.register_user().await {
            Ok(message) => {
                info!(%message, "Registration successful");
                self.store.update(|s| s.user.is_registered = true);
                self.invalidate(Action::Register).await;
                true
            }
            Err(err) => {
                self.fail(Action::Register, &err);
                false
            }
        }
    }

    // ---- savings ------------------------------------------------------

    /// Create a savings pool, then reload pools.
    pub async fn create_pool(&self, pool: NewPool) -> bool {
        let Some(_flight) = self.begin(Action::CreatePool) else {
            return false;
        };
        match self.gateway.create_savings_pool(&pool).await {
            Ok(id) => {
                info!(pool_id = %id, name = %pool.name, "Savings pool created");
                self.invalidate(Action::CreatePool).await;
                true
            }
            Err(err) => {
                self.fail(Action::CreatePool, &err);
                false
            }
        }
    }

    /// Join a group pool, then reload pools.
    pub async fn join_pool(&self, pool: PoolId) -> bool {
        let Some(_flight) = self.begin(Action::JoinPool) else {
            return false;
        };
        match self.gateway.join_pool(pool).await {
            Ok(()) => {
                info!(pool_id = %pool, "Joined pool");
                self.invalidate(Action::JoinPool).await;
                true
            }
            Err(err) => {
                self.fail(Action::JoinPool, &err);
                false
            }
        }
    }

    /// Deposit into a pool, then reload balance and pools.
    pub async fn deposit(&self, pool: PoolId, amount: Btc) -> bool {
        let Some(_flight) = self.begin(Action::Deposit) else {
            return false;
        };
        match self.gateway.deposit_to_pool(pool, amount).await {
            Ok(()) => {
                info!(pool_id = %pool, %amount, "Deposit successful");
                self.invalidate(Action::Deposit).await;
                true
            }
            Err(err) => {
                self.fail(Action::Deposit, &err);
                false
            }
        }
    }

    /// Lock `amount` for `duration_days`, then reload balance and investments.
    pub async fn start_investment(&self, amount: Btc, duration_days: u64) -> bool {
        let Some(_flight) = self.begin(Action::StartInvestment) else {
            return false;
        };
        match self.gateway.start_investment(amount, duration_days).await {
            Ok(()) => {
                info!(%amount, duration_days, "Investment started");
                self.invalidate(Action::StartInvestment).await;
                true
            }
            Err(err) => {
                self.fail(Action::StartInvestment, &err);
                false
            }
        }
    }

    // ---- custody ------------------------------------------------------

    /// Create the custody wallet, then reload the balance.
    pub async fn create_wallet(&self) -> bool {
        let Some(_flight) = self.begin(Action::CreateWallet) else {
            return false;
        };
        match self.gateway.create_wallet().await {
            Ok(address) => {
                info!(%address, "Wallet created");
                self.invalidate(Action::CreateWallet).await;
                true
            }
            Err(err) => {
                self.fail(Action::CreateWallet, &err);
                false
            }
        }
    }

    /// Move wallet funds into a pool, then reload balance and pools.
    pub async fn transfer(&self, amount: Btc, pool: PoolId) -> bool {
        let Some(_flight) = self.begin(Action::Transfer) else {
            return false;
        };
        match self.gateway.transfer_to_savings(amount, pool).await {
            Ok(()) => {
                info!(pool_id = %pool, %amount, "Transferred to savings");
                self.invalidate(Action::Transfer).await;
                true
            }
            Err(err) => {
                self.fail(Action::Transfer, &err);
                false
            }
        }
    }

    /// Credit test funds, then reload the balance.
    pub async fn simulate_deposit(&self, amount: Btc) -> bool {
        let Some(_flight) = self.begin(Action::SimulateDeposit) else {
            return false;
        };
        match self.gateway.simulate_deposit(amount).await {
            Ok(()) => {
                self.invalidate(Action::SimulateDeposit).await;
                true
            }
            Err(err) => {
                self.fail(Action::SimulateDeposit, &err);
                false
            }
        }
    }

    /// Wallet address and balance, `None` without a wallet.
    pub async fn wallet_info(&self) -> Option<WalletInfo> {
        self.gateway.wallet_info().await
    }

    // ---- governance ---------------------------------------------------

    /// Cast a ballot, then reload proposals.
    pub async fn vote(&self, proposal: ProposalId, choice: VoteChoice) -> bool {
        let Some(_flight) = self.begin(Action::Vote) else {
            return false;
        };
        match self.gateway.vote(proposal, choice).await {
            Ok(()) => {
                info!(proposal_id = %proposal, %choice, "Vote recorded");
                self.invalidate(Action::Vote).await;
                true
            }
            Err(err) => {
                self.fail(Action::Vote, &err);
                false
            }
        }
    }

    /// Submit a proposal, then reload proposals.
    pub async fn create_proposal(&self, proposal: NewProposal) -> bool {
        let Some(_flight) = self.begin(Action::CreateProposal) else {
            return false;
        };
        match self.gateway.create_proposal(&proposal).await {
            Ok(()) => {
                info!(title = %proposal.title, kind = %proposal.kind, "Proposal created");
                self.invalidate(Action::CreateProposal).await;
                true
            }
            Err(err) => {
                self.fail(Action::CreateProposal, &err);
                false
            }
        }
    }

    /// Fetch one proposal. Does not touch the snapshot.
    pub async fn proposal(&self, id: ProposalId) -> Option<Proposal> {
        self.gateway.proposal(id).await
    }

    // ---- yield --------------------------------------------------------

    /// Stake into a strategy, then reload balance, strategies and positions.
    pub async fn enter_position(&self, strategy: &StrategyId, amount: Btc) -> bool {
        let Some(_flight) = self.begin(Action::EnterPosition) else {
            return false;
        };
        match self.gateway.enter_position(strategy, amount).await {
            Ok(()) => {
                info!(%strategy, %amount, "Position entered");
                self.invalidate(Action::EnterPosition).await;
                true
            }
            Err(err) => {
                self.fail(Action::EnterPosition, &err);
                false
            }
        }
    }

    /// Claim accrued yield. Returns the amount claimed; zero when nothing was
    /// claimable or the claim failed (see the error slot).
    pub async fn claim_yields(&self) -> Btc {
        let Some(_flight) = self.begin(Action::ClaimYields) else {
            return Decimal::ZERO;
        };
        match self.gateway.claim_yields().await {
            Ok(claimed) if claimed > Decimal::ZERO => {
                info!(%claimed, "Yields claimed");
                self.invalidate(Action::ClaimYields).await;
                claimed
            }
            Ok(_) => {
                debug!("Nothing to claim");
                Decimal::ZERO
            }
            Err(err) => {
                self.fail(Action::ClaimYields, &err);
                Decimal::ZERO
            }
        }
    }

    /// Yield accrued across all positions.
    pub async fn calculate_current_yield(&self) -> Btc {
        self.gateway.current_yield().await
    }

    /// Projected return for a hypothetical stake.
    pub async fn project_returns(
        &self,
        amount: Btc,
        strategy: &StrategyId,
        duration_days: u64,
    ) -> Btc {
        self.gateway
            .project_returns(amount, strategy, duration_days)
            .await
    }

    /// Historical APY of a strategy.
    pub async fn strategy_performance(&self, strategy: &StrategyId) -> Decimal {
        self.gateway.strategy_performance(strategy).await
    }
}
