//! Savings pools.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{PoolId, PrincipalId};
use super::money::Btc;

/// Who can contribute to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Individual,
    Group,
}

impl PoolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "group" => Ok(Self::Group),
            other => Err(format!("unknown pool kind '{other}'")),
        }
    }
}

/// A savings goal with a target and a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsPool {
    pub id: PoolId,
    pub name: String,
    pub target_amount: Btc,
    pub current_amount: Btc,
    pub deadline: DateTime<Utc>,
    pub kind: PoolKind,
    pub creator: PrincipalId,
    pub members: Vec<PrincipalId>,
}

impl SavingsPool {
    /// Progress toward the target in percent, capped at 100.
    ///
    /// A zero target reports zero progress.
    #[must_use]
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let pct = self.current_amount / self.target_amount * Decimal::ONE_HUNDRED;
        pct.min(Decimal::ONE_HUNDRED).max(Decimal::ZERO)
    }

    /// Amount still missing to reach the target.
    #[must_use]
    pub fn remaining(&self) -> Btc {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    #[must_use]
    pub fn has_member(&self, principal: &PrincipalId) -> bool {
        self.creator == *principal || self.members.contains(principal)
    }
}

/// Parameters for creating a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPool {
    pub name: String,
    pub target_amount: Btc,
    pub deadline: DateTime<Utc>,
    pub kind: PoolKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pool(current: Decimal, target: Decimal) -> SavingsPool {
        SavingsPool {
            id: PoolId::new(1),
            name: "Family Vacation".into(),
            target_amount: target,
            current_amount: current,
            deadline: DateTime::UNIX_EPOCH,
            kind: PoolKind::Group,
            creator: PrincipalId::from("creator"),
            members: vec![PrincipalId::from("member")],
        }
    }

    #[test]
    fn progress_is_share_of_target() {
        assert_eq!(pool(dec!(2.45), dec!(5.0)).progress_percent(), dec!(49));
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        assert_eq!(pool(dec!(6), dec!(5)).progress_percent(), dec!(100));
        assert_eq!(pool(dec!(6), dec!(5)).remaining(), Decimal::ZERO);
    }

    #[test]
    fn zero_target_reports_zero_progress() {
        assert_eq!(pool(dec!(1), Decimal::ZERO).progress_percent(), Decimal::ZERO);
    }

    #[test]
    fn creator_counts_as_member() {
        let p = pool(dec!(0), dec!(1));
        assert!(p.has_member(&PrincipalId::from("creator")));
        assert!(p.has_member(&PrincipalId::from("member")));
        assert!(!p.has_member(&PrincipalId::from("stranger")));
    }

    #[test]
    fn pool_kind_parses_case_insensitively() {
        assert_eq!("Group".parse::<PoolKind>(), Ok(PoolKind::Group));
        assert!("family".parse::<PoolKind>().is_err());
    }
}
