//! Yield strategies and the user's positions in them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::StrategyId;
use super::money::{Apy, Btc};

/// Risk tier advertised by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named yield-generating product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldStrategy {
    pub id: StrategyId,
    pub name: String,
    pub base_apy: Apy,
    pub min_amount: Btc,
    pub risk: RiskTier,
    pub is_active: bool,
}

impl YieldStrategy {
    /// Whether `amount` can be staked into this strategy.
    #[must_use]
    pub fn accepts(&self, amount: Btc) -> bool {
        self.is_active && amount >= self.min_amount
    }
}

/// The current user's stake in a strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPosition {
    pub strategy_id: StrategyId,
    pub amount: Btc,
    pub entry_time: DateTime<Utc>,
    pub current_yield: Btc,
    pub claimed_yield: Btc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn inactive_strategy_rejects_any_amount() {
        let strategy = YieldStrategy {
            id: StrategyId::from("btc-lend"),
            name: "BTC Lending".into(),
            base_apy: dec!(4.5),
            min_amount: dec!(0.01),
            risk: RiskTier::Low,
            is_active: false,
        };
        assert!(!strategy.accepts(dec!(1)));
        let active = YieldStrategy {
            is_active: true,
            ..strategy
        };
        assert!(active.accepts(dec!(0.01)));
        assert!(!active.accepts(dec!(0.009)));
    }
}
