use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use nuru::application::{Aggregator, BootstrapState, Collection, Gateway};
use nuru::domain::{NewPool, PoolId, PoolKind, ProposalId, StrategyId, VoteChoice};
use nuru::error::ErrorKind;
use nuru::testkit::backend::{Fault, MockBackend, MockConnector};
use nuru::testkit::domain::{
    credential, pool, position, principal, profile, proposal, strategy, ALICE,
};
use nuru::testkit::{aggregator, gateway};

fn public_backend() -> MockBackend {
    MockBackend::new()
        .with_proposals(vec![proposal(1, "Lower fees"), proposal(2, "Add ckBTC")])
        .with_strategies(vec![
            strategy("btc-lending", dec!(4.5)),
            strategy("liquidity", dec!(8)),
        ])
        .with_pools(vec![pool(7, "House", dec!(1), dec!(0.25))])
}

/// Aggregator whose gateway is bound to [`ALICE`] and who has signed in.
async fn signed_in(backend: MockBackend) -> (Arc<MockConnector>, Arc<Aggregator>, bool) {
    let connector = MockConnector::new(backend);
    let gateway = gateway(&connector);
    let alice = credential(ALICE);
    gateway.initialize(&alice).await.expect("initialize");
    let aggregator = Aggregator::new(gateway);
    let registered = aggregator.sign_in(&alice).await;
    (connector, aggregator, registered)
}

async fn registered(backend: MockBackend) -> (Arc<MockConnector>, Arc<Aggregator>) {
    let (connector, aggregator, registered) = signed_in(backend.with_profile(profile(ALICE))).await;
    assert!(registered);
    connector.backend().reset_calls();
    (connector, aggregator)
}

#[tokio::test]
async fn bootstrap_loads_public_collections() {
    let connector = MockConnector::new(public_backend());
    let aggregator = aggregator(&connector);

    aggregator.bootstrap().await;

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.proposals.len(), 2);
    assert_eq!(snapshot.strategies.len(), 2);
    assert_eq!(snapshot.pools.len(), 1);
    assert_eq!(snapshot.bootstrap, BootstrapState::Ready);
    assert!(!snapshot.is_loading());
    assert!(!snapshot.user.is_authenticated);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn bootstrap_failure_sets_error_and_still_completes() {
    let backend = public_backend();
    backend.fail("getActiveProposals", Fault::Transport);
    let connector = MockConnector::new(backend);
    let aggregator = aggregator(&connector);

    aggregator.bootstrap().await;

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.bootstrap, BootstrapState::Ready);
    assert_eq!(snapshot.strategies.len(), 2);
    assert!(snapshot.proposals.is_empty());
    assert!(snapshot.is_stale(Collection::Proposals));
    let error = snapshot.error.expect("error recorded");
    assert_eq!(error.message, "Failed to initialize app data");
    assert_eq!(error.kind, ErrorKind::Transport);
}

#[tokio::test]
async fn launch_loads_in_background() {
    let connector = MockConnector::new(public_backend());
    let (aggregator, task) = Aggregator::launch(gateway(&connector));

    task.await.expect("bootstrap task");

    assert_eq!(aggregator.snapshot().pools.len(), 1);
}

#[tokio::test]
async fn sign_in_without_profile_requires_registration() {
    let (_, aggregator, registered) = signed_in(MockBackend::new()).await;

    assert!(!registered);
    let user = aggregator.snapshot().user;
    assert!(user.is_authenticated);
    assert!(!user.is_registered);
    assert_eq!(user.principal, Some(principal(ALICE)));
    assert!(aggregator.error().is_none());
}

#[tokio::test]
async fn sign_in_with_profile_loads_balance() {
    let (_, aggregator, registered) = signed_in(
        MockBackend::new()
            .with_profile(profile(ALICE))
            .with_balance_sats(2_500_000),
    )
    .await;

    assert!(registered);
    let user = aggregator.snapshot().user;
    assert!(user.is_registered);
    assert_eq!(user.balance, dec!(0.025));
    assert!(user.profile.is_some());
}

#[tokio::test]
async fn sign_in_transport_failure_is_recorded() {
    let backend = MockBackend::new();
    backend.fail("getUserProfile", Fault::Transport);
    let (_, aggregator, registered) = signed_in(backend).await;

    assert!(!registered);
    let error = aggregator.error().expect("error recorded");
    assert!(error.message.starts_with("Failed to login: "));
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn register_requires_authentication_and_makes_no_calls() {
    let connector = MockConnector::new(MockBackend::new());
    let aggregator = aggregator(&connector);

    assert!(!aggregator.register().await);

    let error = aggregator.error().expect("error recorded");
    assert_eq!(
        error.message,
        "User not authenticated. Please connect your wallet first."
    );
    assert_eq!(error.kind, ErrorKind::Precondition);
    assert_eq!(connector.backend().total_calls(), 0);
}

#[tokio::test]
async fn register_twice_is_rejected_locally() {
    let (connector, aggregator) = registered(MockBackend::new()).await;

    assert!(!aggregator.register().await);

    assert_eq!(
        aggregator.error().map(|e| e.message),
        Some("User already registered".to_string())
    );
    assert_eq!(connector.backend().calls("registerUser"), 0);
}

#[tokio::test]
async fn register_creates_profile_and_refetches_it() {
    let (connector, aggregator, registered) = signed_in(MockBackend::new()).await;
    assert!(!registered);
    connector.backend().reset_calls();

    assert!(aggregator.register().await);

    let backend = connector.backend();
    assert_eq!(backend.calls("registerUser"), 1);
    assert_eq!(backend.calls("getUserProfile"), 1);
    let user = aggregator.snapshot().user;
    assert!(user.is_registered);
    assert!(user.profile.is_some());
}

#[tokio::test]
async fn create_pool_refetches_pools_once() {
    let (connector, aggregator) = registered(MockBackend::new()).await;
    let pool = NewPool {
        name: "Emergency fund".into(),
        target_amount: dec!(0.5),
        deadline: Utc::now() + Duration::days(90),
        kind: PoolKind::Individual,
    };

    assert!(aggregator.create_pool(pool).await);

    assert_eq!(connector.backend().calls("getAllActivePools"), 1);
    let pools = aggregator.snapshot().pools;
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].id, PoolId::new(1));
    assert_eq!(pools[0].name, "Emergency fund");
}

#[tokio::test]
async fn deposit_refreshes_balance_and_pools_once() {
    let (connector, aggregator) = registered(public_backend().with_balance_sats(5_000_000)).await;

    assert!(aggregator.deposit(PoolId::new(7), dec!(0.01)).await);

    let backend = connector.backend();
    assert_eq!(backend.calls("depositToPool"), 1);
    assert_eq!(backend.calls("getBalance"), 1);
    assert_eq!(backend.calls("getAllActivePools"), 1);
    assert_eq!(backend.calls("getActiveProposals"), 0);
    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.pools[0].current_amount, dec!(0.26));
    assert!(!snapshot.busy);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn busy_is_set_while_an_action_runs() {
    let (connector, aggregator) = registered(public_backend()).await;
    connector.backend().pause("depositToPool");

    let deposit = {
        let aggregator = Arc::clone(&aggregator);
        tokio::spawn(async move { aggregator.deposit(PoolId::new(7), dec!(0.01)).await })
    };
    let mut rx = aggregator.subscribe();
    rx.wait_for(|s| s.busy).await.expect("store alive");
    assert!(aggregator.is_busy());

    connector.backend().resume("depositToPool");
    assert!(deposit.await.expect("join"));
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn duplicate_action_in_flight_is_rejected() {
    let (connector, aggregator) = registered(public_backend()).await;
    connector.backend().pause("depositToPool");

    let first = {
        let aggregator = Arc::clone(&aggregator);
        tokio::spawn(async move { aggregator.deposit(PoolId::new(7), dec!(0.01)).await })
    };
    let mut rx = aggregator.subscribe();
    rx.wait_for(|s| s.busy).await.expect("store alive");

    assert!(!aggregator.deposit(PoolId::new(7), dec!(0.01)).await);
    let error = aggregator.error().expect("duplicate recorded");
    assert_eq!(error.message, "Failed to deposit to pool: already in progress");
    assert!(aggregator.is_busy());

    connector.backend().resume("depositToPool");
    assert!(first.await.expect("join"));
    assert_eq!(connector.backend().calls("depositToPool"), 1);
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn failed_action_records_message_and_skips_refresh() {
    let backend = public_backend();
    backend.fail("depositToPool", Fault::Remote("Insufficient funds".into()));
    let (connector, aggregator) = registered(backend).await;

    assert!(!aggregator.deposit(PoolId::new(7), dec!(1)).await);

    let error = aggregator.error().expect("error recorded");
    assert_eq!(error.message, "Failed to deposit to pool: Insufficient funds");
    assert_eq!(error.kind, ErrorKind::Remote);
    assert_eq!(connector.backend().calls("getBalance"), 0);
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn transport_fault_on_write_clears_busy_and_skips_refresh() {
    let backend = public_backend();
    backend.fail("depositToPool", Fault::Transport);
    let (connector, aggregator) = registered(backend).await;

    assert!(!aggregator.deposit(PoolId::new(7), dec!(0.01)).await);

    let error = aggregator.error().expect("error recorded");
    assert_eq!(error.kind, ErrorKind::Transport);
    assert!(error.message.starts_with("Failed to deposit to pool: "));
    assert_eq!(connector.backend().calls("getBalance"), 0);
    assert_eq!(connector.backend().calls("getAllActivePools"), 0);
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn timed_out_write_clears_busy_and_skips_refresh() {
    let connector = MockConnector::new(public_backend().with_profile(profile(ALICE)));
    let gateway = Arc::new(Gateway::new(
        Arc::clone(&connector) as _,
        std::time::Duration::from_millis(20),
    ));
    let alice = credential(ALICE);
    gateway.initialize(&alice).await.expect("initialize");
    let aggregator = Aggregator::new(gateway);
    assert!(aggregator.sign_in(&alice).await);
    connector.backend().reset_calls();
    connector.backend().pause("createWallet");

    assert!(!aggregator.create_wallet().await);

    let error = aggregator.error().expect("timeout recorded");
    assert_eq!(error.kind, ErrorKind::Transport);
    assert!(error.message.contains("timed out"));
    assert_eq!(connector.backend().calls("getBalance"), 0);
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn oversized_transfer_is_rejected_without_a_remote_call() {
    let (connector, aggregator) = registered(public_backend()).await;
    let amount = dec!(1000000000000000000000);

    assert!(!aggregator.transfer(amount, PoolId::new(7)).await);
    let error = aggregator.error().expect("error recorded");
    assert_eq!(error.kind, ErrorKind::Precondition);
    assert!(error.message.starts_with("Failed to transfer to savings: "));

    assert!(!aggregator.simulate_deposit(Decimal::MAX).await);
    assert_eq!(
        aggregator.error().expect("error recorded").kind,
        ErrorKind::Precondition
    );

    assert_eq!(connector.backend().calls("transferToSavings"), 0);
    assert_eq!(connector.backend().calls("simulateDeposit"), 0);
    assert!(!aggregator.is_busy());
}

#[tokio::test]
async fn next_action_clears_previous_error() {
    let backend = public_backend();
    backend.edit(|w| w.pools[0].creator = principal("ksuya-2yaaa-aaaab-qaaba"));
    backend.fail("joinPool", Fault::Remote("Pool is full".into()));
    let (connector, aggregator) = registered(backend).await;
    assert!(!aggregator.join_pool(PoolId::new(7)).await);
    assert!(aggregator.error().is_some());

    connector.backend().heal("joinPool");
    assert!(aggregator.join_pool(PoolId::new(7)).await);

    assert!(aggregator.error().is_none());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_data() {
    let connector = MockConnector::new(public_backend());
    let aggregator = aggregator(&connector);
    aggregator.bootstrap().await;

    connector
        .backend()
        .fail("getAllActivePools", Fault::Transport);
    assert!(!aggregator.refresh(Collection::Pools).await);

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.pools.len(), 1);
    assert!(snapshot.is_stale(Collection::Pools));
    assert!(snapshot.error.is_none());

    connector.backend().heal("getAllActivePools");
    aggregator.get_all_active_pools().await;
    assert!(!aggregator.snapshot().is_stale(Collection::Pools));
}

#[tokio::test]
async fn identity_bound_refresh_is_skipped_without_principal() {
    let connector = MockConnector::new(MockBackend::new().with_balance_sats(100));
    let aggregator = aggregator(&connector);

    assert!(aggregator.refresh(Collection::Balance).await);
    aggregator.get_user_positions().await;

    assert_eq!(connector.backend().total_calls(), 0);
    assert_eq!(aggregator.snapshot().user.balance, Decimal::ZERO);
}

#[tokio::test]
async fn vote_refetches_proposals() {
    let (connector, aggregator) = registered(public_backend()).await;

    assert!(aggregator.vote(ProposalId::new(2), VoteChoice::For).await);

    assert_eq!(connector.backend().calls("getActiveProposals"), 1);
    let proposals = aggregator.snapshot().proposals;
    let voted = proposals
        .iter()
        .find(|p| p.id == ProposalId::new(2))
        .expect("proposal 2");
    assert_eq!(voted.votes_for, 1);
}

#[tokio::test]
async fn enter_position_refreshes_balance_strategies_and_positions() {
    let (connector, aggregator) = registered(public_backend()).await;

    assert!(
        aggregator
            .enter_position(&StrategyId::new("btc-lending"), dec!(0.1))
            .await
    );

    let backend = connector.backend();
    assert_eq!(backend.calls("getBalance"), 1);
    assert_eq!(backend.calls("getAvailableStrategies"), 1);
    assert_eq!(backend.calls("getUserPositions"), 1);
    assert_eq!(aggregator.snapshot().positions.len(), 1);
}

#[tokio::test]
async fn claim_refreshes_only_when_something_was_claimed() {
    let backend = public_backend()
        .with_positions(vec![position("btc-lending", dec!(1), dec!(0.002))]);
    let (connector, aggregator) = registered(backend).await;

    assert_eq!(aggregator.claim_yields().await, dec!(0.002));
    assert_eq!(connector.backend().calls("getUserPositions"), 1);
    assert_eq!(
        aggregator.snapshot().positions[0].claimed_yield,
        dec!(0.002)
    );

    assert_eq!(aggregator.claim_yields().await, Decimal::ZERO);
    assert_eq!(connector.backend().calls("getUserPositions"), 1);
    assert!(aggregator.error().is_none());
}

#[tokio::test]
async fn start_investment_refreshes_investments() {
    let (connector, aggregator) = registered(MockBackend::new()).await;

    assert!(aggregator.start_investment(dec!(0.3), 90).await);

    assert_eq!(connector.backend().calls("getUserInvestments"), 1);
    let investments = aggregator.snapshot().investments;
    assert_eq!(investments.len(), 1);
    assert_eq!(investments[0].duration_days, 90);
}

#[tokio::test]
async fn wallet_flow_updates_balance() {
    let (connector, aggregator) = registered(public_backend()).await;

    assert!(aggregator.create_wallet().await);
    assert!(aggregator.simulate_deposit(dec!(0.05)).await);
    assert!(aggregator.transfer(dec!(0.02), PoolId::new(7)).await);

    let info = aggregator.wallet_info().await.expect("wallet exists");
    assert_eq!(info.balance, dec!(0.03));
    assert_eq!(aggregator.snapshot().user.balance, dec!(0.03));
    assert_eq!(connector.backend().world().pools[0].current_amount, dec!(0.27));
}

#[tokio::test]
async fn sign_out_keeps_public_data() {
    let backend = public_backend()
        .with_positions(vec![position("btc-lending", dec!(1), dec!(0))]);
    let (_, aggregator) = registered(backend).await;
    aggregator.bootstrap().await;
    aggregator.get_user_positions().await;
    assert_eq!(aggregator.snapshot().positions.len(), 1);

    aggregator.sign_out();

    let snapshot = aggregator.snapshot();
    assert!(!snapshot.user.is_authenticated);
    assert!(snapshot.user.principal.is_none());
    assert!(snapshot.positions.is_empty());
    assert_eq!(snapshot.pools.len(), 1);
    assert_eq!(snapshot.proposals.len(), 2);
}

#[tokio::test]
async fn portfolio_sums_pools_and_positions() {
    let backend = public_backend()
        .with_balance_sats(10_000_000)
        .with_positions(vec![position("btc-lending", dec!(1), dec!(0.01))]);
    let (_, aggregator) = registered(backend).await;
    aggregator.bootstrap().await;
    aggregator.get_user_positions().await;
    aggregator.get_balance().await;

    let summary = aggregator.portfolio();

    assert_eq!(summary.balance, dec!(0.1));
    assert_eq!(summary.pool_count, 1);
    assert_eq!(summary.total_saved, dec!(0.25));
    assert_eq!(summary.total_staked, dec!(1));
    assert_eq!(summary.weighted_apy, dec!(4.5));
    assert_eq!(summary.net_worth(), dec!(1.36));
}
