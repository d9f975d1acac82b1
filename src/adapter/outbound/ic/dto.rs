//! Candid wire types for the four backend canisters.
//!
//! Field names follow the canisters' camelCase interfaces. Fields whose
//! presence varies between canister versions are `opt`: candid decodes an
//! absent or mistyped field as `None` instead of failing the whole record.

use candid::{CandidType, Deserialize, Int, Nat, Principal};

use crate::domain::deadline::from_nanos;
use crate::domain::money::{from_f64, sats_to_btc};
use crate::domain::{
    Investment, PoolId, PoolKind, PrincipalId, Proposal, ProposalId, ProposalKind,
    ProposalStatus, Reply, RiskTier, SavingsPool, StrategyId, UserPosition, UserProfile,
    VoteChoice, WalletInfo, YieldStrategy,
};

/// Motoko `Result<T, Text>`.
#[derive(CandidType, Deserialize, Debug)]
pub enum WireResult<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "err")]
    Err(String),
}

impl<T> WireResult<T> {
    /// Convert the success payload, keeping the remote message on failure.
    pub fn into_reply<U>(self, f: impl FnOnce(T) -> Result<U, String>) -> Result<Reply<U>, String> {
        match self {
            Self::Ok(value) => f(value).map(Reply::Ok),
            Self::Err(message) => Ok(Reply::Err(message)),
        }
    }
}

pub fn nat_u64(value: &Nat) -> Result<u64, String> {
    u64::try_from(&value.0).map_err(|_| format!("nat out of range: {value}"))
}

pub fn int_i64(value: &Int) -> Result<i64, String> {
    i64::try_from(&value.0).map_err(|_| format!("int out of range: {value}"))
}

fn principal(value: &Principal) -> PrincipalId {
    PrincipalId::new(value.to_text())
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy)]
pub enum WirePoolType {
    #[serde(rename = "individual")]
    Individual,
    #[serde(rename = "group")]
    Group,
}

impl From<PoolKind> for WirePoolType {
    fn from(kind: PoolKind) -> Self {
        match kind {
            PoolKind::Individual => Self::Individual,
            PoolKind::Group => Self::Group,
        }
    }
}

impl From<WirePoolType> for PoolKind {
    fn from(kind: WirePoolType) -> Self {
        match kind {
            WirePoolType::Individual => Self::Individual,
            WirePoolType::Group => Self::Group,
        }
    }
}

#[derive(CandidType, Deserialize, Debug)]
pub struct WireUser {
    pub id: Principal,
    #[serde(rename = "joinedAt")]
    pub joined_at: Option<Int>,
    #[serde(rename = "savingsPools")]
    pub savings_pools: Option<Vec<Nat>>,
}

impl TryFrom<WireUser> for UserProfile {
    type Error = String;

    fn try_from(user: WireUser) -> Result<Self, String> {
        let registered_at = user
            .joined_at
            .as_ref()
            .map(int_i64)
            .transpose()?
            .map(from_nanos);
        let pools = user
            .savings_pools
            .unwrap_or_default()
            .iter()
            .map(|id| nat_u64(id).map(PoolId::new))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            principal: principal(&user.id),
            registered_at,
            pools,
        })
    }
}

#[derive(CandidType, Deserialize, Debug)]
pub struct WirePool {
    pub id: Nat,
    pub name: String,
    #[serde(rename = "targetAmount")]
    pub target_amount: f64,
    #[serde(rename = "currentAmount")]
    pub current_amount: f64,
    pub deadline: Int,
    #[serde(rename = "poolType")]
    pub pool_type: WirePoolType,
    pub creator: Principal,
    pub members: Option<Vec<Principal>>,
}

impl TryFrom<WirePool> for SavingsPool {
    type Error = String;

    fn try_from(pool: WirePool) -> Result<Self, String> {
        Ok(Self {
            id: PoolId::new(nat_u64(&pool.id)?),
            name: pool.name,
            target_amount: from_f64(pool.target_amount),
            current_amount: from_f64(pool.current_amount),
            deadline: from_nanos(int_i64(&pool.deadline)?),
            kind: pool.pool_type.into(),
            creator: principal(&pool.creator),
            members: pool.members.unwrap_or_default().iter().map(principal).collect(),
        })
    }
}

#[derive(CandidType, Deserialize, Debug)]
pub struct WireInvestment {
    pub amount: f64,
    pub duration: Int,
    #[serde(rename = "startTime")]
    pub start_time: Int,
    #[serde(rename = "expectedReturn")]
    pub expected_return: Option<f64>,
}

impl TryFrom<WireInvestment> for Investment {
    type Error = String;

    fn try_from(investment: WireInvestment) -> Result<Self, String> {
        let duration = int_i64(&investment.duration)?;
        Ok(Self {
            amount: from_f64(investment.amount),
            duration_days: u64::try_from(duration).map_err(|_| "negative duration".to_string())?,
            start_time: from_nanos(int_i64(&investment.start_time)?),
            expected_return: investment.expected_return.map(from_f64),
        })
    }
}

/// Custody wallet. The balance is in satoshis.
#[derive(CandidType, Deserialize, Debug)]
pub struct WireWallet {
    pub address: String,
    pub balance: Option<Nat>,
}

impl TryFrom<WireWallet> for WalletInfo {
    type Error = String;

    fn try_from(wallet: WireWallet) -> Result<Self, String> {
        let sats = wallet.balance.as_ref().map(nat_u64).transpose()?;
        Ok(Self {
            address: wallet.address,
            balance: sats_to_btc(sats.unwrap_or(0)),
        })
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy)]
pub enum WireProposalType {
    #[serde(rename = "newFeature")]
    NewFeature,
    #[serde(rename = "parameterChange")]
    ParameterChange,
    #[serde(rename = "treasurySpend")]
    TreasurySpend,
}

impl From<ProposalKind> for WireProposalType {
    fn from(kind: ProposalKind) -> Self {
        match kind {
            ProposalKind::NewFeature => Self::NewFeature,
            ProposalKind::ParameterChange => Self::ParameterChange,
            ProposalKind::TreasurySpend => Self::TreasurySpend,
        }
    }
}

impl From<WireProposalType> for ProposalKind {
    fn from(kind: WireProposalType) -> Self {
        match kind {
            WireProposalType::NewFeature => Self::NewFeature,
            WireProposalType::ParameterChange => Self::ParameterChange,
            WireProposalType::TreasurySpend => Self::TreasurySpend,
        }
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy)]
pub enum WireProposalStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "executed")]
    Executed,
}

impl From<WireProposalStatus> for ProposalStatus {
    fn from(status: WireProposalStatus) -> Self {
        match status {
            WireProposalStatus::Active => Self::Active,
            WireProposalStatus::Passed => Self::Passed,
            WireProposalStatus::Rejected => Self::Rejected,
            WireProposalStatus::Executed => Self::Executed,
        }
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy)]
pub enum WireVote {
    #[serde(rename = "for")]
    For,
    #[serde(rename = "against")]
    Against,
}

impl From<VoteChoice> for WireVote {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::For => Self::For,
            VoteChoice::Against => Self::Against,
        }
    }
}

#[derive(CandidType, Deserialize, Debug)]
pub struct WireProposal {
    pub id: Nat,
    pub proposer: Principal,
    pub title: String,
    pub description: String,
    #[serde(rename = "proposalType")]
    pub proposal_type: WireProposalType,
    #[serde(rename = "votesFor")]
    pub votes_for: Nat,
    #[serde(rename = "votesAgainst")]
    pub votes_against: Nat,
    pub status: WireProposalStatus,
    #[serde(rename = "createdAt")]
    pub created_at: Int,
    #[serde(rename = "votingDeadline")]
    pub voting_deadline: Int,
}

impl TryFrom<WireProposal> for Proposal {
    type Error = String;

    fn try_from(proposal: WireProposal) -> Result<Self, String> {
        Ok(Self {
            id: ProposalId::new(nat_u64(&proposal.id)?),
            proposer: principal(&proposal.proposer),
            title: proposal.title,
            description: proposal.description,
            kind: proposal.proposal_type.into(),
            votes_for: nat_u64(&proposal.votes_for)?,
            votes_against: nat_u64(&proposal.votes_against)?,
            status: proposal.status.into(),
            created_at: from_nanos(int_i64(&proposal.created_at)?),
            voting_deadline: from_nanos(int_i64(&proposal.voting_deadline)?),
        })
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy)]
pub enum WireRisk {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl From<WireRisk> for RiskTier {
    fn from(risk: WireRisk) -> Self {
        match risk {
            WireRisk::Low => Self::Low,
            WireRisk::Medium => Self::Medium,
            WireRisk::High => Self::High,
        }
    }
}

#[derive(CandidType, Deserialize, Debug)]
pub struct WireStrategy {
    pub id: String,
    pub name: String,
    pub apy: f64,
    #[serde(rename = "minAmount")]
    pub min_amount: Option<f64>,
    pub risk: Option<WireRisk>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

impl From<WireStrategy> for YieldStrategy {
    fn from(strategy: WireStrategy) -> Self {
        Self {
            id: StrategyId::new(strategy.id),
            name: strategy.name,
            base_apy: from_f64(strategy.apy),
            min_amount: strategy.min_amount.map(from_f64).unwrap_or_default(),
            risk: strategy.risk.map_or(RiskTier::Medium, RiskTier::from),
            is_active: strategy.is_active.unwrap_or(true),
        }
    }
}

#[derive(CandidType, Deserialize, Debug)]
pub struct WirePosition {
    #[serde(rename = "strategyId")]
    pub strategy_id: String,
    pub amount: f64,
    #[serde(rename = "entryTime")]
    pub entry_time: Int,
    #[serde(rename = "currentYield")]
    pub current_yield: Option<f64>,
    #[serde(rename = "claimedYield")]
    pub claimed_yield: Option<f64>,
}

impl TryFrom<WirePosition> for UserPosition {
    type Error = String;

    fn try_from(position: WirePosition) -> Result<Self, String> {
        Ok(Self {
            strategy_id: StrategyId::new(position.strategy_id),
            amount: from_f64(position.amount),
            entry_time: from_nanos(int_i64(&position.entry_time)?),
            current_yield: position.current_yield.map(from_f64).unwrap_or_default(),
            claimed_yield: position.claimed_yield.map(from_f64).unwrap_or_default(),
        })
    }
}

/// Convert every element, failing on the first bad record.
pub fn convert_all<W, D>(items: Vec<W>) -> Result<Vec<D>, String>
where
    D: TryFrom<W, Error = String>,
{
    items.into_iter().map(D::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn wallet_balance_converts_from_satoshis() {
        let wallet = WireWallet {
            address: "bc1q-test".into(),
            balance: Some(Nat::from(150_000_000u64)),
        };
        let info = WalletInfo::try_from(wallet).unwrap();
        assert_eq!(info.balance, dec!(1.5));
    }

    #[test]
    fn remote_err_is_kept_as_reply() {
        let result: WireResult<Nat> = WireResult::Err("Pool not found".into());
        let reply = result.into_reply(|n| nat_u64(&n)).unwrap();
        assert_eq!(reply, Reply::Err("Pool not found".into()));
    }

    #[test]
    fn strategy_defaults_missing_optional_fields() {
        let strategy = YieldStrategy::from(WireStrategy {
            id: "btc-lending".into(),
            name: "BTC Lending".into(),
            apy: 4.5,
            min_amount: None,
            risk: None,
            is_active: None,
        });
        assert_eq!(strategy.base_apy, dec!(4.5));
        assert!(strategy.is_active);
        assert_eq!(strategy.risk, RiskTier::Medium);
    }

    #[test]
    fn candid_result_round_trips_wire_names() {
        let bytes = candid::encode_one(WireResult::<String>::Ok("registered".into())).unwrap();
        let decoded: WireResult<String> = candid::decode_one(&bytes).unwrap();
        assert!(matches!(decoded, WireResult::Ok(ref s) if s == "registered"));
    }
}
