use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use nuru::application::Gateway;
use nuru::domain::{PoolId, ProposalId, StrategyId};
use nuru::error::{ErrorKind, GatewayError};
use nuru::testkit::backend::{Fault, MockBackend, MockConnector};
use nuru::testkit::domain::{credential, pool, proposal, strategy, ALICE};
use nuru::testkit::gateway;

async fn signed_in(backend: MockBackend) -> (Arc<MockConnector>, Arc<Gateway>) {
    let connector = MockConnector::new(backend);
    let gateway = gateway(&connector);
    gateway
        .initialize(&credential(ALICE))
        .await
        .expect("initialize");
    (connector, gateway)
}

#[tokio::test]
async fn identity_bound_calls_fail_before_initialize() {
    let connector = MockConnector::new(MockBackend::new());
    let gateway = gateway(&connector);

    assert!(!gateway.is_initialized());
    assert_eq!(
        gateway.register_user().await,
        Err(GatewayError::NotInitialized)
    );
    assert_eq!(
        gateway.try_balance().await,
        Err(GatewayError::NotInitialized)
    );
    assert_eq!(connector.backend().total_calls(), 0);
}

#[tokio::test]
async fn public_reads_work_anonymously() {
    let connector = MockConnector::new(
        MockBackend::new()
            .with_pools(vec![pool(1, "House", dec!(1), dec!(0.2))])
            .with_proposals(vec![proposal(4, "Lower fees")])
            .with_strategies(vec![strategy("btc-lending", dec!(4.5))]),
    );
    let gateway = gateway(&connector);

    assert_eq!(gateway.active_pools().await.len(), 1);
    assert_eq!(gateway.active_proposals().await.len(), 1);
    assert_eq!(gateway.strategies().await.len(), 1);
    // One anonymous actor set serves every public read.
    assert_eq!(connector.connects(), 1);
}

#[tokio::test]
async fn reset_drops_identity_but_keeps_public_reads() {
    let (_connector, gateway) =
        signed_in(MockBackend::new().with_pools(vec![pool(1, "House", dec!(1), dec!(0))])).await;
    assert!(gateway.is_initialized());

    gateway.reset();

    assert!(!gateway.is_initialized());
    assert_eq!(gateway.try_balance().await, Err(GatewayError::NotInitialized));
    assert_eq!(gateway.active_pools().await.len(), 1);
}

#[tokio::test]
async fn balance_is_converted_from_sats() {
    let (_, gateway) = signed_in(MockBackend::new().with_balance_sats(1_500_000)).await;
    assert_eq!(gateway.balance().await, dec!(0.015));
}

#[tokio::test]
async fn transfer_sends_whole_sats() {
    let (connector, gateway) = signed_in(
        MockBackend::new()
            .with_balance_sats(10_000_000)
            .with_pools(vec![pool(3, "Trip", dec!(1), dec!(0))]),
    )
    .await;

    gateway
        .transfer_to_savings(dec!(0.012345678), PoolId::new(3))
        .await
        .expect("transfer");

    let world = connector.backend().world();
    assert_eq!(world.balance_sats, 10_000_000 - 1_234_567);
    assert_eq!(world.pools[0].current_amount, dec!(0.01234567));
}

#[tokio::test]
async fn read_faults_become_neutral_values() {
    let backend = MockBackend::new().with_pools(vec![pool(1, "House", dec!(1), dec!(0))]);
    backend.fail("getAllActivePools", Fault::Transport);
    backend.fail("getBalance", Fault::Transport);
    backend.fail("getWalletInfo", Fault::Remote("Wallet not found".into()));
    let (_, gateway) = signed_in(backend).await;

    assert!(gateway.active_pools().await.is_empty());
    assert_eq!(gateway.balance().await, Decimal::ZERO);
    assert_eq!(gateway.wallet_info().await, None);
    assert!(gateway.try_active_pools().await.is_err());
}

#[tokio::test]
async fn tagged_read_failure_is_none_not_error() {
    let (_, gateway) = signed_in(MockBackend::new()).await;

    // No profile registered: the remote reports an error variant.
    assert_eq!(gateway.try_user_profile().await, Ok(None));
    assert_eq!(gateway.try_proposal(ProposalId::new(9)).await, Ok(None));
}

#[tokio::test]
async fn write_failure_carries_remote_message() {
    let (_, gateway) = signed_in(MockBackend::new()).await;

    let err = gateway
        .join_pool(PoolId::new(42))
        .await
        .expect_err("pool does not exist");
    assert_eq!(err, GatewayError::Remote("Pool not found".into()));
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn calls_time_out() {
    let backend = MockBackend::new();
    backend.pause("getBalance");
    let connector = MockConnector::new(backend);
    let gateway = Gateway::new(Arc::clone(&connector) as _, Duration::from_millis(20));
    gateway
        .initialize(&credential(ALICE))
        .await
        .expect("initialize");

    assert_eq!(
        gateway.try_balance().await,
        Err(GatewayError::Timeout {
            method: "getBalance",
            after_ms: 20
        })
    );
    assert_eq!(gateway.balance().await, Decimal::ZERO);
}

#[tokio::test]
async fn failed_connect_is_a_transport_error() {
    let connector = MockConnector::new(MockBackend::new());
    connector.fail_connect(true);
    let gateway = gateway(&connector);

    let err = gateway
        .initialize(&credential(ALICE))
        .await
        .expect_err("connect fails");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!gateway.is_initialized());
    assert!(gateway.active_pools().await.is_empty());
}

#[tokio::test]
async fn yield_projections_pass_through() {
    let (_, gateway) =
        signed_in(MockBackend::new().with_strategies(vec![strategy("btc-lending", dec!(10))]))
            .await;
    let lending = StrategyId::new("btc-lending");

    assert_eq!(
        gateway.project_returns(dec!(1), &lending, 365).await,
        dec!(0.1)
    );
    assert_eq!(gateway.strategy_performance(&lending).await, dec!(10));
    assert_eq!(
        gateway
            .project_returns(dec!(1), &StrategyId::new("unknown"), 365)
            .await,
        Decimal::ZERO
    );
}
