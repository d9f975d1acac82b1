//! Governance proposals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{PrincipalId, ProposalId};

/// What a proposal changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProposalKind {
    NewFeature,
    ParameterChange,
    TreasurySpend,
}

impl ProposalKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewFeature => "feature",
            Self::ParameterChange => "parameter",
            Self::TreasurySpend => "treasury",
        }
    }
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "feature" | "newfeature" => Ok(Self::NewFeature),
            "parameter" | "parameterchange" => Ok(Self::ParameterChange),
            "treasury" | "treasuryspend" => Ok(Self::TreasurySpend),
            other => Err(format!("unknown proposal kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Active,
    Passed,
    Rejected,
    Executed,
}

impl ProposalStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Passed => "passed",
            Self::Rejected => "rejected",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    For,
    Against,
}

impl VoteChoice {
    #[must_use]
    pub const fn from_support(support: bool) -> Self {
        if support {
            Self::For
        } else {
            Self::Against
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::For => f.write_str("for"),
            Self::Against => f.write_str("against"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: PrincipalId,
    pub title: String,
    pub description: String,
    pub kind: ProposalKind,
    pub votes_for: u64,
    pub votes_against: u64,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub voting_deadline: DateTime<Utc>,
}

/// Share of votes on each side, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteShare {
    pub for_percent: Decimal,
    pub against_percent: Decimal,
}

impl Proposal {
    #[must_use]
    pub const fn total_votes(&self) -> u64 {
        self.votes_for.saturating_add(self.votes_against)
    }

    /// Percentage split of the tally. Both sides are zero when nobody voted.
    #[must_use]
    pub fn vote_share(&self) -> VoteShare {
        let total = self.total_votes();
        if total == 0 {
            return VoteShare {
                for_percent: Decimal::ZERO,
                against_percent: Decimal::ZERO,
            };
        }
        let total = Decimal::from(total);
        let for_percent =
            (Decimal::from(self.votes_for) / total * Decimal::ONE_HUNDRED).round_dp(2);
        VoteShare {
            for_percent,
            against_percent: Decimal::ONE_HUNDRED - for_percent,
        }
    }

    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == ProposalStatus::Active && now < self.voting_deadline
    }
}

/// Parameters for submitting a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProposal {
    pub title: String,
    pub description: String,
    pub kind: ProposalKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn proposal(votes_for: u64, votes_against: u64) -> Proposal {
        Proposal {
            id: ProposalId::new(1),
            proposer: PrincipalId::from("proposer"),
            title: "Lower pool fees".into(),
            description: "Reduce the pool management fee.".into(),
            kind: ProposalKind::ParameterChange,
            votes_for,
            votes_against,
            status: ProposalStatus::Active,
            created_at: DateTime::UNIX_EPOCH,
            voting_deadline: DateTime::UNIX_EPOCH + chrono::Duration::days(7),
        }
    }

    #[test]
    fn vote_share_splits_tally() {
        let share = proposal(45, 15).vote_share();
        assert_eq!(share.for_percent, dec!(75));
        assert_eq!(share.against_percent, dec!(25));
    }

    #[test]
    fn vote_share_is_zero_without_votes() {
        let share = proposal(0, 0).vote_share();
        assert_eq!(share.for_percent, Decimal::ZERO);
        assert_eq!(share.against_percent, Decimal::ZERO);
    }

    #[test]
    fn open_until_deadline() {
        let p = proposal(1, 1);
        assert!(p.is_open(DateTime::UNIX_EPOCH + chrono::Duration::days(1)));
        assert!(!p.is_open(DateTime::UNIX_EPOCH + chrono::Duration::days(8)));
    }

    #[test]
    fn kind_accepts_short_and_wire_names() {
        assert_eq!("treasury".parse::<ProposalKind>(), Ok(ProposalKind::TreasurySpend));
        assert_eq!("newFeature".parse::<ProposalKind>(), Ok(ProposalKind::NewFeature));
    }
}
