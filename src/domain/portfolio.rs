//! Client-side totals across the current user's holdings.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::PrincipalId;
use super::money::{Apy, Btc};
use super::pool::SavingsPool;
use super::yields::{UserPosition, YieldStrategy};

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub balance: Btc,
    /// Sum of current amounts of pools the user created or joined.
    pub total_saved: Btc,
    pub pool_count: usize,
    pub total_staked: Btc,
    pub accrued_yield: Btc,
    pub claimed_yield: Btc,
    /// Stake-weighted base APY across positions with a known strategy.
    pub weighted_apy: Apy,
}

impl PortfolioSummary {
    #[must_use]
    pub fn compute(
        principal: Option<&PrincipalId>,
        balance: Btc,
        pools: &[SavingsPool],
        positions: &[UserPosition],
        strategies: &[YieldStrategy],
    ) -> Self {
        let mine: Vec<&SavingsPool> = match principal {
            Some(p) => pools.iter().filter(|pool| pool.has_member(p)).collect(),
            None => Vec::new(),
        };

        let total_staked: Btc = positions.iter().map(|p| p.amount).sum();
        let mut weighted = Decimal::ZERO;
        let mut weight = Decimal::ZERO;
        for position in positions {
            if let Some(strategy) = strategies.iter().find(|s| s.id == position.strategy_id) {
                weighted += strategy.base_apy * position.amount;
                weight += position.amount;
            }
        }
        let weighted_apy = if weight > Decimal::ZERO {
            (weighted / weight).round_dp(2)
        } else {
            Decimal::ZERO
        };

        Self {
            balance,
            total_saved: mine.iter().map(|p| p.current_amount).sum(),
            pool_count: mine.len(),
            total_staked,
            accrued_yield: positions.iter().map(|p| p.current_yield).sum(),
            claimed_yield: positions.iter().map(|p| p.claimed_yield).sum(),
            weighted_apy,
        }
    }

    /// Everything the user holds: wallet, pools and stakes.
    #[must_use]
    pub fn net_worth(&self) -> Btc {
        self.balance + self.total_saved + self.total_staked + self.accrued_yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{PoolId, StrategyId};
    use crate::domain::pool::PoolKind;
    use crate::domain::yields::RiskTier;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn pool(id: u64, creator: &str, members: &[&str], current: Decimal) -> SavingsPool {
        SavingsPool {
            id: PoolId::new(id),
            name: format!("pool-{id}"),
            target_amount: dec!(10),
            current_amount: current,
            deadline: DateTime::UNIX_EPOCH,
            kind: PoolKind::Group,
            creator: PrincipalId::from(creator),
            members: members.iter().map(|m| PrincipalId::from(*m)).collect(),
        }
    }

    fn position(strategy: &str, amount: Decimal, accrued: Decimal) -> UserPosition {
        UserPosition {
            strategy_id: StrategyId::from(strategy),
            amount,
            entry_time: DateTime::UNIX_EPOCH,
            current_yield: accrued,
            claimed_yield: dec!(0.001),
        }
    }

    fn strategy(id: &str, apy: Decimal) -> YieldStrategy {
        YieldStrategy {
            id: StrategyId::from(id),
            name: id.into(),
            base_apy: apy,
            min_amount: dec!(0.001),
            risk: RiskTier::Medium,
            is_active: true,
        }
    }

    #[test]
    fn totals_only_count_pools_the_user_belongs_to() {
        let me = PrincipalId::from("me");
        let pools = vec![
            pool(1, "me", &[], dec!(2.45)),
            pool(2, "other", &["me"], dec!(0.87)),
            pool(3, "other", &["someone"], dec!(5)),
        ];

        let summary = PortfolioSummary::compute(Some(&me), dec!(1), &pools, &[], &[]);
        assert_eq!(summary.pool_count, 2);
        assert_eq!(summary.total_saved, dec!(3.32));
        assert_eq!(summary.net_worth(), dec!(4.32));
    }

    #[test]
    fn weighted_apy_uses_stake_sizes() {
        let positions = vec![
            position("low", dec!(3), dec!(0.01)),
            position("mid", dec!(1), dec!(0.02)),
        ];
        let strategies = vec![strategy("low", dec!(4)), strategy("mid", dec!(8))];

        let summary = PortfolioSummary::compute(None, dec!(0), &[], &positions, &strategies);
        assert_eq!(summary.total_staked, dec!(4));
        assert_eq!(summary.accrued_yield, dec!(0.03));
        assert_eq!(summary.claimed_yield, dec!(0.002));
        assert_eq!(summary.weighted_apy, dec!(5));
    }

    #[test]
    fn anonymous_user_has_no_pools() {
        let pools = vec![pool(1, "me", &[], dec!(1))];
        let summary = PortfolioSummary::compute(None, dec!(0), &pools, &[], &[]);
        assert_eq!(summary.pool_count, 0);
        assert_eq!(summary.total_saved, Decimal::ZERO);
    }
}
