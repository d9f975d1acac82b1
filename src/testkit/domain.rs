//! Builders for domain entities used across tests.
//!
//! Every builder fills the fields tests rarely care about with fixed values
//! so assertions can focus on the interesting ones.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    Btc, Credential, Investment, PoolId, PoolKind, PrincipalId, Proposal, ProposalId,
    ProposalKind, ProposalStatus, RiskTier, SavingsPool, StrategyId, UserPosition, UserProfile,
    YieldStrategy,
};

/// Principal used when a test does not care which user is signed in.
pub const ALICE: &str = "w7x7r-cok77-xa";

/// Fixed reference instant (2024-01-01T00:00:00Z).
pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0)
        .single()
        .unwrap_or_default()
}

pub fn principal(id: &str) -> PrincipalId {
    PrincipalId::new(id)
}

/// Credential whose key material is the principal text.
pub fn credential(id: &str) -> Credential {
    Credential::new(principal(id), id.as_bytes().to_vec())
}

pub fn profile(id: &str) -> UserProfile {
    UserProfile {
        principal: principal(id),
        registered_at: Some(epoch()),
        pools: Vec::new(),
    }
}

/// Individual pool created by [`ALICE`], due 30 days after [`epoch`].
pub fn pool(id: u64, name: &str, target: Btc, current: Btc) -> SavingsPool {
    SavingsPool {
        id: PoolId::new(id),
        name: name.to_string(),
        target_amount: target,
        current_amount: current,
        deadline: epoch() + Duration::days(30),
        kind: PoolKind::Individual,
        creator: principal(ALICE),
        members: Vec::new(),
    }
}

/// Active proposal with no votes, open for seven days after [`epoch`].
pub fn proposal(id: u64, title: &str) -> Proposal {
    Proposal {
        id: ProposalId::new(id),
        proposer: principal(ALICE),
        title: title.to_string(),
        description: format!("{title} description"),
        kind: ProposalKind::NewFeature,
        votes_for: 0,
        votes_against: 0,
        status: ProposalStatus::Active,
        created_at: epoch(),
        voting_deadline: epoch() + Duration::days(7),
    }
}

/// Active low-risk strategy with no minimum.
pub fn strategy(id: &str, apy: Decimal) -> YieldStrategy {
    YieldStrategy {
        id: StrategyId::new(id),
        name: id.replace('-', " "),
        base_apy: apy,
        min_amount: Decimal::ZERO,
        risk: RiskTier::Low,
        is_active: true,
    }
}

pub fn position(strategy: &str, amount: Btc, accrued: Btc) -> UserPosition {
    UserPosition {
        strategy_id: StrategyId::new(strategy),
        amount,
        entry_time: epoch(),
        current_yield: accrued,
        claimed_yield: Decimal::ZERO,
    }
}

pub fn investment(amount: Btc, days: u64) -> Investment {
    Investment {
        amount,
        duration_days: days,
        start_time: epoch(),
        expected_return: None,
    }
}
