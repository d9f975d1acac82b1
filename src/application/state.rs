//! Shared application state.
//!
//! The store is a single watch channel: the aggregator is the only writer,
//! every reader gets an immutable [`AppSnapshot`] clone or a subscription.

use std::collections::BTreeSet;

use serde::Serialize;
use tokio::sync::watch;

use super::invalidation::Collection;
use crate::domain::{
    Investment, PortfolioSummary, Proposal, SavingsPool, UserPosition, UserState, YieldStrategy,
};
use crate::error::ErrorKind;

/// Progress of the public-data load run at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Message recorded in the shared error slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything the view layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub user: UserState,
    pub proposals: Vec<Proposal>,
    pub strategies: Vec<YieldStrategy>,
    pub positions: Vec<UserPosition>,
    pub pools: Vec<SavingsPool>,
    pub investments: Vec<Investment>,
    pub bootstrap: BootstrapState,
    /// True while at least one mutating action is in flight.
    pub busy: bool,
    pub error: Option<AppError>,
    /// Collections whose last refresh failed and still show older data.
    pub stale: BTreeSet<Collection>,
}

impl AppSnapshot {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.bootstrap == BootstrapState::Loading
    }

    #[must_use]
    pub fn is_stale(&self, collection: Collection) -> bool {
        self.stale.contains(&collection)
    }

    #[must_use]
    pub fn portfolio(&self) -> PortfolioSummary {
        PortfolioSummary::compute(
            self.user.principal.as_ref(),
            self.user.balance,
            &self.pools,
            &self.positions,
            &self.strategies,
        )
    }
}

/// Single-writer store backing the aggregator.
pub(crate) struct Store {
    tx: watch::Sender<AppSnapshot>,
}

impl Store {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(AppSnapshot::default());
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> AppSnapshot {
        self.tx.borrow().clone()
    }

    /// Read part of the current snapshot without cloning all of it.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&AppSnapshot) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.tx.subscribe()
    }

    /// Apply a mutation. Writers are serialized by the channel's lock.
    pub(crate) fn update(&self, f: impl FnOnce(&mut AppSnapshot)) {
        self.tx.send_modify(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_snapshot_is_empty_and_idle() {
        let store = Store::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.bootstrap, BootstrapState::Uninitialized);
        assert!(!snapshot.busy);
        assert!(!snapshot.user.is_authenticated);
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn updates_reach_subscribers() {
        let store = Store::new();
        let mut rx = store.subscribe();
        store.update(|s| s.bootstrap = BootstrapState::Loading);
        assert!(rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().is_loading());
    }
}
