use std::sync::Arc;

use rust_decimal_macros::dec;

use nuru::application::SessionStatus;
use nuru::error::Error;
use nuru::testkit::backend::{MockBackend, MockConnector};
use nuru::testkit::client;
use nuru::testkit::domain::{credential, pool, principal, profile, strategy, ALICE};
use nuru::testkit::identity::ScriptedIdentityProvider;

fn backend() -> MockBackend {
    MockBackend::new()
        .with_pools(vec![pool(7, "House", dec!(1), dec!(0.25))])
        .with_strategies(vec![strategy("btc-lending", dec!(4.5))])
}

#[tokio::test]
async fn start_restores_session_and_loads_public_data() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let connector = MockConnector::new(backend().with_profile(profile(ALICE)));
    let client = client(&provider, &connector);

    let status = client.start().await.expect("start");

    assert_eq!(status, SessionStatus::Authenticated);
    assert!(client.gateway().is_initialized());
    let snapshot = client.aggregator().snapshot();
    assert!(snapshot.user.is_registered);
    assert_eq!(snapshot.user.principal, Some(principal(ALICE)));
    assert_eq!(snapshot.pools.len(), 1);
    assert_eq!(snapshot.strategies.len(), 1);
}

#[tokio::test]
async fn restore_without_session_makes_no_identity_calls() {
    let provider = ScriptedIdentityProvider::new();
    let connector = MockConnector::new(backend());
    let client = client(&provider, &connector);

    let status = client.restore().await.expect("restore");

    assert_eq!(status, SessionStatus::Unauthenticated);
    assert!(!client.gateway().is_initialized());
    assert_eq!(connector.backend().total_calls(), 0);
}

#[tokio::test]
async fn sign_in_reports_unregistered_user() {
    let provider = ScriptedIdentityProvider::new();
    provider.queue_login(Ok(credential(ALICE)));
    let connector = MockConnector::new(backend());
    let client = client(&provider, &connector);
    client.restore().await.expect("restore");

    let registered = client.sign_in().await.expect("sign in");

    assert!(!registered);
    assert!(client.session().is_authenticated());
    assert!(client.gateway().is_initialized());
    let user = client.aggregator().snapshot().user;
    assert!(user.is_authenticated);
    assert!(!user.is_registered);
    assert_eq!(connector.backend().world().caller, Some(principal(ALICE)));
}

#[tokio::test]
async fn sign_in_then_register() {
    let provider = ScriptedIdentityProvider::new();
    provider.queue_login(Ok(credential(ALICE)));
    let connector = MockConnector::new(backend());
    let client = client(&provider, &connector);
    client.restore().await.expect("restore");
    client.sign_in().await.expect("sign in");

    assert!(client.aggregator().register().await);

    assert!(client.aggregator().snapshot().user.is_registered);
}

#[tokio::test]
async fn sign_in_fails_when_actors_cannot_be_bound() {
    let provider = ScriptedIdentityProvider::new();
    provider.queue_login(Ok(credential(ALICE)));
    let connector = MockConnector::new(backend());
    connector.fail_connect(true);
    let client = client(&provider, &connector);
    client.restore().await.expect("restore");

    let result = client.sign_in().await;

    assert!(matches!(result, Err(Error::Gateway(_))));
    assert!(!client.gateway().is_initialized());
    assert_eq!(client.session().status(), SessionStatus::Unauthenticated);
    assert!(client.session().credential().is_none());
    assert!(!client.aggregator().snapshot().user.is_authenticated);
    assert!(provider.persisted().is_none());
}

#[tokio::test]
async fn restore_drops_credential_when_actors_cannot_be_bound() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let connector = MockConnector::new(backend().with_profile(profile(ALICE)));
    connector.fail_connect(true);
    let client = client(&provider, &connector);

    let result = client.restore().await;

    assert!(matches!(result, Err(Error::Gateway(_))));
    assert_eq!(client.session().status(), SessionStatus::Unauthenticated);
    assert!(client.session().credential().is_none());
    assert!(!client.gateway().is_initialized());
    assert!(provider.persisted().is_some());
}

#[tokio::test]
async fn sign_out_resets_every_layer() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let connector = MockConnector::new(backend().with_profile(profile(ALICE)));
    let client = client(&provider, &connector);
    client.start().await.expect("start");

    client.sign_out().await;

    assert_eq!(client.session().status(), SessionStatus::Unauthenticated);
    assert!(!client.gateway().is_initialized());
    assert!(provider.persisted().is_none());
    let snapshot = client.aggregator().snapshot();
    assert!(!snapshot.user.is_authenticated);
    assert_eq!(snapshot.pools.len(), 1);
}

#[tokio::test]
async fn aggregator_can_be_shared_across_tasks() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let connector = MockConnector::new(backend().with_profile(profile(ALICE)));
    let client = Arc::new(client(&provider, &connector));
    client.start().await.expect("start");

    let mut rx = client.aggregator().subscribe();
    let task = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.aggregator().simulate_deposit(dec!(0.5)).await })
    };
    assert!(task.await.expect("join"));
    rx.wait_for(|s| s.user.balance == dec!(0.5))
        .await
        .expect("balance update");
}
