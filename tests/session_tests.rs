use std::sync::Arc;

use nuru::application::{SessionManager, SessionStatus};
use nuru::error::SessionError;
use nuru::testkit::domain::{credential, principal, ALICE};
use nuru::testkit::identity::ScriptedIdentityProvider;

fn manager(provider: &Arc<ScriptedIdentityProvider>) -> Arc<SessionManager> {
    Arc::new(SessionManager::new(Arc::clone(provider) as _))
}

#[tokio::test]
async fn initialize_without_session_is_unauthenticated() {
    let provider = ScriptedIdentityProvider::new();
    let session = manager(&provider);
    assert_eq!(session.status(), SessionStatus::Uninitialized);

    let status = session.initialize().await.expect("initialize");

    assert_eq!(status, SessionStatus::Unauthenticated);
    assert!(session.credential().is_none());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn initialize_restores_persisted_session() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let session = manager(&provider);

    let status = session.initialize().await.expect("initialize");

    assert_eq!(status, SessionStatus::Authenticated);
    assert_eq!(session.principal(), Some(principal(ALICE)));
}

#[tokio::test]
async fn initialize_runs_once() {
    let provider = ScriptedIdentityProvider::new();
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    assert_eq!(
        session.initialize().await,
        Err(SessionError::AlreadyInitialized)
    );
    assert_eq!(provider.restore_count(), 1);
}

#[tokio::test]
async fn restore_failure_leaves_session_unauthenticated() {
    let provider = ScriptedIdentityProvider::new();
    provider.fail_restore(SessionError::Storage("corrupt session file".into()));
    let session = manager(&provider);

    assert_eq!(
        session.initialize().await,
        Ok(SessionStatus::Unauthenticated)
    );
}

#[tokio::test]
async fn sign_in_before_initialize_fails() {
    let provider = ScriptedIdentityProvider::new();
    let session = manager(&provider);

    assert_eq!(
        session.sign_in().await.map(|c| c.principal().clone()),
        Err(SessionError::NotInitialized)
    );
    assert_eq!(provider.login_count(), 0);
}

#[tokio::test]
async fn sign_in_stores_credential() {
    let provider = ScriptedIdentityProvider::new();
    provider.queue_login(Ok(credential(ALICE)));
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    let credential = session.sign_in().await.expect("sign in");

    assert_eq!(credential.principal(), &principal(ALICE));
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert!(provider.persisted().is_some());
}

#[tokio::test]
async fn failed_sign_in_returns_to_unauthenticated() {
    let provider = ScriptedIdentityProvider::new();
    provider.queue_login(Err(SessionError::AuthFailed("window closed".into())));
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    let err = session.sign_in().await.expect_err("login fails");

    assert_eq!(err, SessionError::AuthFailed("window closed".into()));
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(session.credential().is_none());
}

#[tokio::test]
async fn sign_in_when_authenticated_returns_existing_credential() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    let credential = session.sign_in().await.expect("already signed in");

    assert_eq!(credential.principal(), &principal(ALICE));
    assert_eq!(provider.login_count(), 0);
}

#[tokio::test]
async fn concurrent_sign_in_is_rejected() {
    let provider = ScriptedIdentityProvider::new();
    provider.queue_login(Ok(credential(ALICE)));
    provider.hold_login();
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.sign_in().await })
    };
    let mut status = session.subscribe();
    status
        .wait_for(|s| *s == SessionStatus::Authenticating)
        .await
        .expect("status channel open");
    assert!(session.status().is_loading());

    assert_eq!(
        session.sign_in().await.map(|c| c.principal().clone()),
        Err(SessionError::SignInInProgress)
    );

    provider.release_login();
    let credential = first.await.expect("join").expect("first sign-in");
    assert_eq!(credential.principal(), &principal(ALICE));
    assert_eq!(provider.login_count(), 1);
}

#[tokio::test]
async fn sign_out_clears_credential() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    session.sign_out().await;

    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(session.credential().is_none());
    assert!(provider.persisted().is_none());
}

#[tokio::test]
async fn double_sign_out_is_harmless() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    session.sign_out().await;
    session.sign_out().await;

    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert_eq!(provider.logout_count(), 2);
}

#[tokio::test]
async fn logout_error_is_swallowed() {
    let provider = ScriptedIdentityProvider::restoring(credential(ALICE));
    provider.fail_logout(SessionError::Storage("read-only filesystem".into()));
    let session = manager(&provider);
    session.initialize().await.expect("initialize");

    session.sign_out().await;

    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(session.credential().is_none());
}
