//! Which stored collections each mutating action makes stale.

use std::fmt;

use serde::Serialize;

/// A refreshable slice of the aggregator's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Profile,
    Balance,
    Pools,
    Proposals,
    Strategies,
    Positions,
    Investments,
}

impl Collection {
    /// Collections readable without signing in.
    pub const PUBLIC: [Collection; 3] = [Self::Proposals, Self::Strategies, Self::Pools];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Balance => "balance",
            Self::Pools => "pools",
            Self::Proposals => "proposals",
            Self::Strategies => "strategies",
            Self::Positions => "positions",
            Self::Investments => "investments",
        }
    }

    /// Whether fetching needs a signed-in principal.
    #[must_use]
    pub const fn is_identity_bound(self) -> bool {
        matches!(
            self,
            Self::Profile | Self::Balance | Self::Positions | Self::Investments
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutating actions exposed by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SignIn,
    Register,
    CreatePool,
    JoinPool,
    Deposit,
    CreateWallet,
    Transfer,
    SimulateDeposit,
    Vote,
    CreateProposal,
    EnterPosition,
    ClaimYields,
    StartInvestment,
}

impl Action {
    /// Collections re-fetched after the action succeeds.
    #[must_use]
    pub const fn invalidates(self) -> &'static [Collection] {
        use Collection::*;
        match self {
            Self::SignIn => &[],
            Self::Register => &[Profile],
            Self::CreatePool | Self::JoinPool => &[Pools],
            Self::Deposit | Self::Transfer => &[Balance, Pools],
            Self::CreateWallet | Self::SimulateDeposit => &[Balance],
            Self::Vote | Self::CreateProposal => &[Proposals],
            Self::EnterPosition => &[Balance, Strategies, Positions],
            Self::ClaimYields => &[Balance, Positions],
            Self::StartInvestment => &[Balance, Investments],
        }
    }

    /// Label prefixed to failure messages recorded in the error slot.
    #[must_use]
    pub const fn failure_label(self) -> &'static str {
        match self {
            Self::SignIn => "Failed to login",
            Self::Register => "Registration failed",
            Self::CreatePool => "Failed to create savings pool",
            Self::JoinPool => "Failed to join pool",
            Self::Deposit => "Failed to deposit to pool",
            Self::CreateWallet => "Failed to create wallet",
            Self::Transfer => "Failed to transfer to savings",
            Self::SimulateDeposit => "Failed to simulate deposit",
            Self::Vote => "Failed to vote",
            Self::CreateProposal => "Failed to create proposal",
            Self::EnterPosition => "Failed to enter position",
            Self::ClaimYields => "Failed to claim yields",
            Self::StartInvestment => "Failed to start investment",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::Register => "register",
            Self::CreatePool => "create_pool",
            Self::JoinPool => "join_pool",
            Self::Deposit => "deposit",
            Self::CreateWallet => "create_wallet",
            Self::Transfer => "transfer",
            Self::SimulateDeposit => "simulate_deposit",
            Self::Vote => "vote",
            Self::CreateProposal => "create_proposal",
            Self::EnterPosition => "enter_position",
            Self::ClaimYields => "claim_yields",
            Self::StartInvestment => "start_investment",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_invalidates_balance_and_pools() {
        assert_eq!(
            Action::Deposit.invalidates(),
            &[Collection::Balance, Collection::Pools]
        );
    }

    #[test]
    fn entering_a_position_invalidates_three_collections() {
        assert_eq!(
            Action::EnterPosition.invalidates(),
            &[
                Collection::Balance,
                Collection::Strategies,
                Collection::Positions
            ]
        );
    }

    #[test]
    fn governance_actions_only_touch_proposals() {
        for action in [Action::Vote, Action::CreateProposal] {
            assert_eq!(action.invalidates(), &[Collection::Proposals]);
        }
    }

    #[test]
    fn public_collections_need_no_identity() {
        assert!(Collection::PUBLIC.iter().all(|c| !c.is_identity_bound()));
    }
}
