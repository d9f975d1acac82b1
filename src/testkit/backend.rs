//! In-memory stand-in for the four remote services.
//!
//! [`MockBackend`] keeps a small mutable world (pools, proposals, strategies,
//! positions, a satoshi balance) and implements every actor trait against
//! it. Tests can:
//!
//! - seed state through the `with_*` builders or [`MockBackend::edit`];
//! - inject a [`Fault`] per method name;
//! - [`pause`](MockBackend::pause) a method until
//!   [`resume`](MockBackend::resume) (or forever, to exercise timeouts);
//! - count invocations per method name.
//!
//! Method names are the remote ones (`getAllActivePools`, `depositToPool`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;

use crate::domain::money::sats_to_btc;
use crate::domain::{
    Btc, Credential, Investment, NewPool, NewProposal, PoolId, PrincipalId, Proposal, ProposalId,
    ProposalStatus, Reply, SavingsPool, StrategyId, UserPosition, UserProfile, VoteChoice,
    WalletInfo, YieldStrategy,
};
use crate::error::GatewayError;
use crate::port::{
    ActorConnector, ActorSet, CallResult, CoreActor, CustodyActor, GovernanceActor, YieldActor,
};

/// Scripted failure for one method.
#[derive(Debug, Clone)]
pub enum Fault {
    /// The call does not complete.
    Transport,
    /// The call completes with this failure message. Methods without a
    /// tagged result report it as a transport fault instead.
    Remote(String),
}

/// Remote world state.
#[derive(Debug, Default, Clone)]
pub struct World {
    /// Principal of the most recent identity-bound connection.
    pub caller: Option<PrincipalId>,
    pub profile: Option<UserProfile>,
    pub balance_sats: u64,
    pub wallet_address: Option<String>,
    pub pools: Vec<SavingsPool>,
    pub proposals: Vec<Proposal>,
    pub strategies: Vec<YieldStrategy>,
    pub positions: Vec<UserPosition>,
    pub investments: Vec<Investment>,
    pub next_pool_id: u64,
    pub next_proposal_id: u64,
}

#[derive(Default)]
pub struct MockBackend {
    world: Mutex<World>,
    faults: Mutex<HashMap<&'static str, Fault>>,
    calls: Mutex<HashMap<&'static str, u32>>,
    gates: Mutex<HashMap<&'static str, Arc<Semaphore>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            world: Mutex::new(World {
                next_pool_id: 1,
                next_proposal_id: 1,
                ..World::default()
            }),
            ..Self::default()
        }
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.world.lock().profile = Some(profile);
        self
    }

    pub fn with_balance_sats(self, sats: u64) -> Self {
        self.world.lock().balance_sats = sats;
        self
    }

    pub fn with_pools(self, pools: Vec<SavingsPool>) -> Self {
        {
            let mut world = self.world.lock();
            let max = pools.iter().map(|p| p.id.value()).max().unwrap_or(0);
            world.next_pool_id = world.next_pool_id.max(max + 1);
            world.pools = pools;
        }
        self
    }

    pub fn with_proposals(self, proposals: Vec<Proposal>) -> Self {
        {
            let mut world = self.world.lock();
            let max = proposals.iter().map(|p| p.id.value()).max().unwrap_or(0);
            world.next_proposal_id = world.next_proposal_id.max(max + 1);
            world.proposals = proposals;
        }
        self
    }

    pub fn with_strategies(self, strategies: Vec<YieldStrategy>) -> Self {
        self.world.lock().strategies = strategies;
        self
    }

    pub fn with_positions(self, positions: Vec<UserPosition>) -> Self {
        self.world.lock().positions = positions;
        self
    }

    /// Mutate the world in place.
    pub fn edit(&self, f: impl FnOnce(&mut World)) {
        f(&mut self.world.lock());
    }

    /// Copy of the current world.
    pub fn world(&self) -> World {
        self.world.lock().clone()
    }

    pub fn fail(&self, method: &'static str, fault: Fault) {
        self.faults.lock().insert(method, fault);
    }

    pub fn heal(&self, method: &'static str) {
        self.faults.lock().remove(method);
    }

    /// Block calls to `method` until [`resume`](Self::resume).
    pub fn pause(&self, method: &'static str) {
        self.gates.lock().insert(method, Arc::new(Semaphore::new(0)));
    }

    pub fn resume(&self, method: &'static str) {
        if let Some(gate) = self.gates.lock().remove(method) {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    /// Number of invocations of `method` so far.
    pub fn calls(&self, method: &str) -> u32 {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    /// Total invocations across all methods.
    pub fn total_calls(&self) -> u32 {
        self.calls.lock().values().sum()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    /// Record the call, wait on any gate, then apply any scripted fault.
    ///
    /// `Ok(Some(message))` means the call should report a remote failure.
    async fn enter(&self, method: &'static str) -> CallResult<Option<String>> {
        *self.calls.lock().entry(method).or_insert(0) += 1;

        let gate = self.gates.lock().get(method).cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }

        match self.faults.lock().get(method) {
            Some(Fault::Transport) => Err(GatewayError::transport(method, "scripted fault")),
            Some(Fault::Remote(message)) => Ok(Some(message.clone())),
            None => Ok(None),
        }
    }

    /// Like [`enter`](Self::enter) for methods whose result is untagged.
    async fn enter_untagged(&self, method: &'static str) -> CallResult<()> {
        match self.enter(method).await? {
            Some(message) => Err(GatewayError::transport(method, message)),
            None => Ok(()),
        }
    }

    fn caller(&self) -> PrincipalId {
        self.world
            .lock()
            .caller
            .clone()
            .unwrap_or_else(PrincipalId::anonymous)
    }
}

macro_rules! remote_failure {
    ($backend:expr, $method:literal) => {
        if let Some(message) = $backend.enter($method).await? {
            return Ok(Reply::Err(message));
        }
    };
}

#[async_trait]
impl CoreActor for MockBackend {
    async fn register_user(&self) -> CallResult<Reply<String>> {
        remote_failure!(self, "registerUser");
        let caller = self.caller();
        let mut world = self.world.lock();
        if world.profile.is_some() {
            return Ok(Reply::Err("User already registered".into()));
        }
        world.profile = Some(UserProfile {
            principal: caller,
            registered_at: Some(Utc::now()),
            pools: Vec::new(),
        });
        Ok(Reply::Ok("User registered successfully".into()))
    }

    async fn get_user_profile(&self) -> CallResult<Reply<UserProfile>> {
        remote_failure!(self, "getUserProfile");
        Ok(match self.world.lock().profile.clone() {
            Some(profile) => Reply::Ok(profile),
            None => Reply::Err("User not found".into()),
        })
    }

    async fn get_all_active_pools(&self) -> CallResult<Vec<SavingsPool>> {
        self.enter_untagged("getAllActivePools").await?;
        Ok(self.world.lock().pools.clone())
    }

    async fn create_savings_pool(&self, pool: &NewPool) -> CallResult<Reply<PoolId>> {
        remote_failure!(self, "createSavingsPool");
        let caller = self.caller();
        let mut world = self.world.lock();
        let id = PoolId::new(world.next_pool_id);
        world.next_pool_id += 1;
        world.pools.push(SavingsPool {
            id,
            name: pool.name.clone(),
            target_amount: pool.target_amount,
            current_amount: Decimal::ZERO,
            deadline: pool.deadline,
            kind: pool.kind,
            creator: caller,
            members: Vec::new(),
        });
        Ok(Reply::Ok(id))
    }

    async fn join_pool(&self, pool: PoolId) -> CallResult<Reply<()>> {
        remote_failure!(self, "joinPool");
        let caller = self.caller();
        let mut world = self.world.lock();
        let Some(target) = world.pools.iter_mut().find(|p| p.id == pool) else {
            return Ok(Reply::Err("Pool not found".into()));
        };
        if target.has_member(&caller) {
            return Ok(Reply::Err("Already a member".into()));
        }
        target.members.push(caller);
        Ok(Reply::Ok(()))
    }

    async fn deposit_to_pool(&self, pool: PoolId, amount: Btc) -> CallResult<Reply<()>> {
        remote_failure!(self, "depositToPool");
        let mut world = self.world.lock();
        let Some(target) = world.pools.iter_mut().find(|p| p.id == pool) else {
            return Ok(Reply::Err("Pool not found".into()));
        };
        target.current_amount += amount;
        Ok(Reply::Ok(()))
    }

    async fn start_investment(&self, amount: Btc, duration_days: u64) -> CallResult<Reply<()>> {
        remote_failure!(self, "startInvestment");
        self.world.lock().investments.push(Investment {
            amount,
            duration_days,
            start_time: Utc::now(),
            expected_return: None,
        });
        Ok(Reply::Ok(()))
    }

    async fn get_user_investments(&self, _user: &PrincipalId) -> CallResult<Vec<Investment>> {
        self.enter_untagged("getUserInvestments").await?;
        Ok(self.world.lock().investments.clone())
    }
}

#[async_trait]
impl CustodyActor for MockBackend {
    async fn get_wallet_info(&self) -> CallResult<Reply<WalletInfo>> {
        remote_failure!(self, "getWalletInfo");
        let world = self.world.lock();
        Ok(match &world.wallet_address {
            Some(address) => Reply::Ok(WalletInfo {
                address: address.clone(),
                balance: sats_to_btc(world.balance_sats),
            }),
            None => Reply::Err("Wallet not found".into()),
        })
    }

    async fn get_balance(&self) -> CallResult<Reply<u64>> {
        remote_failure!(self, "getBalance");
        Ok(Reply::Ok(self.world.lock().balance_sats))
    }

    async fn create_wallet(&self) -> CallResult<Reply<String>> {
        remote_failure!(self, "createWallet");
        let mut world = self.world.lock();
        if world.wallet_address.is_some() {
            return Ok(Reply::Err("Wallet already exists".into()));
        }
        let address = "bc1qmockaddress0000000000000000000000000".to_string();
        world.wallet_address = Some(address.clone());
        Ok(Reply::Ok(address))
    }

    async fn transfer_to_savings(&self, sats: u64, pool: PoolId) -> CallResult<Reply<()>> {
        remote_failure!(self, "transferToSavings");
        let mut world = self.world.lock();
        if world.balance_sats < sats {
            return Ok(Reply::Err("Insufficient balance".into()));
        }
        let Some(target) = world.pools.iter_mut().find(|p| p.id == pool) else {
            return Ok(Reply::Err("Pool not found".into()));
        };
        target.current_amount += sats_to_btc(sats);
        world.balance_sats -= sats;
        Ok(Reply::Ok(()))
    }

    async fn simulate_deposit(&self, sats: u64) -> CallResult<Reply<()>> {
        remote_failure!(self, "simulateDeposit");
        self.world.lock().balance_sats += sats;
        Ok(Reply::Ok(()))
    }
}

#[async_trait]
impl GovernanceActor for MockBackend {
    async fn get_active_proposals(&self) -> CallResult<Vec<Proposal>> {
        self.enter_untagged("getActiveProposals").await?;
        Ok(self
            .world
            .lock()
            .proposals
            .iter()
            .filter(|p| p.status == ProposalStatus::Active)
            .cloned()
            .collect())
    }

    async fn get_proposal(&self, id: ProposalId) -> CallResult<Reply<Proposal>> {
        remote_failure!(self, "getProposal");
        Ok(match self.world.lock().proposals.iter().find(|p| p.id == id) {
            Some(proposal) => Reply::Ok(proposal.clone()),
            None => Reply::Err("Proposal not found".into()),
        })
    }

    async fn vote(&self, id: ProposalId, choice: VoteChoice) -> CallResult<Reply<()>> {
        remote_failure!(self, "vote");
        let mut world = self.world.lock();
        let Some(proposal) = world.proposals.iter_mut().find(|p| p.id == id) else {
            return Ok(Reply::Err("Proposal not found".into()));
        };
        match choice {
            VoteChoice::For => proposal.votes_for += 1,
            VoteChoice::Against => proposal.votes_against += 1,
        }
        Ok(Reply::Ok(()))
    }

    async fn create_proposal(&self, proposal: &NewProposal) -> CallResult<Reply<()>> {
        remote_failure!(self, "createProposal");
        let caller = self.caller();
        let mut world = self.world.lock();
        let id = ProposalId::new(world.next_proposal_id);
        world.next_proposal_id += 1;
        let now = Utc::now();
        world.proposals.push(Proposal {
            id,
            proposer: caller,
            title: proposal.title.clone(),
            description: proposal.description.clone(),
            kind: proposal.kind,
            votes_for: 0,
            votes_against: 0,
            status: ProposalStatus::Active,
            created_at: now,
            voting_deadline: now + chrono::Duration::days(7),
        });
        Ok(Reply::Ok(()))
    }
}

#[async_trait]
impl YieldActor for MockBackend {
    async fn get_available_strategies(&self) -> CallResult<Vec<YieldStrategy>> {
        self.enter_untagged("getAvailableStrategies").await?;
        Ok(self.world.lock().strategies.clone())
    }

    async fn enter_position(&self, strategy: &StrategyId, amount: Btc) -> CallResult<Reply<()>> {
        remote_failure!(self, "enterPosition");
        let mut world = self.world.lock();
        let Some(known) = world.strategies.iter().find(|s| s.id == *strategy) else {
            return Ok(Reply::Err("Strategy not found".into()));
        };
        if !known.accepts(amount) {
            return Ok(Reply::Err("Amount below strategy minimum".into()));
        }
        world.positions.push(UserPosition {
            strategy_id: strategy.clone(),
            amount,
            entry_time: Utc::now(),
            current_yield: Decimal::ZERO,
            claimed_yield: Decimal::ZERO,
        });
        Ok(Reply::Ok(()))
    }

    async fn get_user_positions(&self) -> CallResult<Vec<UserPosition>> {
        self.enter_untagged("getUserPositions").await?;
        Ok(self.world.lock().positions.clone())
    }

    async fn calculate_current_yield(&self) -> CallResult<Reply<Btc>> {
        remote_failure!(self, "calculateCurrentYield");
        Ok(Reply::Ok(
            self.world.lock().positions.iter().map(|p| p.current_yield).sum(),
        ))
    }

    async fn claim_yields(&self) -> CallResult<Reply<Btc>> {
        remote_failure!(self, "claimYields");
        let mut world = self.world.lock();
        let mut claimed = Decimal::ZERO;
        for position in &mut world.positions {
            claimed += position.current_yield;
            position.claimed_yield += position.current_yield;
            position.current_yield = Decimal::ZERO;
        }
        Ok(Reply::Ok(claimed))
    }

    async fn project_returns(
        &self,
        amount: Btc,
        strategy: &StrategyId,
        duration_days: u64,
    ) -> CallResult<Reply<Btc>> {
        remote_failure!(self, "projectReturns");
        let world = self.world.lock();
        let Some(known) = world.strategies.iter().find(|s| s.id == *strategy) else {
            return Ok(Reply::Err("Strategy not found".into()));
        };
        let years = Decimal::from(duration_days) / Decimal::from(365);
        Ok(Reply::Ok(
            amount * known.base_apy / Decimal::ONE_HUNDRED * years,
        ))
    }

    async fn get_strategy_performance(&self, strategy: &StrategyId) -> CallResult<Reply<Decimal>> {
        remote_failure!(self, "getStrategyPerformance");
        Ok(
            match self.world.lock().strategies.iter().find(|s| s.id == *strategy) {
                Some(known) => Reply::Ok(known.base_apy),
                None => Reply::Err("Strategy not found".into()),
            },
        )
    }
}

/// Connector handing out the same [`MockBackend`] for every identity.
pub struct MockConnector {
    backend: Arc<MockBackend>,
    fail: Mutex<bool>,
    connects: AtomicU32,
}

impl MockConnector {
    pub fn new(backend: MockBackend) -> Arc<Self> {
        Arc::new(Self {
            backend: Arc::new(backend),
            fail: Mutex::new(false),
            connects: AtomicU32::new(0),
        })
    }

    pub fn backend(&self) -> &MockBackend {
        &self.backend
    }

    /// Make subsequent connects fail.
    pub fn fail_connect(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActorConnector for MockConnector {
    async fn connect(&self, credential: Option<&Credential>) -> CallResult<ActorSet> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock() {
            return Err(GatewayError::transport("connect", "replica unreachable"));
        }
        if let Some(credential) = credential {
            self.backend
                .edit(|w| w.caller = Some(credential.principal().clone()));
        }
        Ok(ActorSet {
            core: Arc::clone(&self.backend) as _,
            custody: Arc::clone(&self.backend) as _,
            governance: Arc::clone(&self.backend) as _,
            yields: Arc::clone(&self.backend) as _,
        })
    }
}
