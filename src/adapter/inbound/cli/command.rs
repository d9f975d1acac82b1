//! Command-line interface definitions.
//!
//! Defines the `nuru` CLI using `clap`. Every subcommand maps onto one
//! client operation; reads that need an identity require a prior `login`.

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

use super::paths;
use crate::domain::{PoolKind, ProposalKind, VoteChoice};

/// Bitcoin savings, governance and yield on the Internet Computer
#[derive(Parser, Debug)]
#[command(name = "nuru")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with an identity PEM file
    Login,

    /// Sign out and forget the persisted session
    Logout,

    /// Show session and account status
    Status,

    /// Register the signed-in principal
    Register,

    /// Savings pools
    #[command(subcommand)]
    Pools(PoolsCommand),

    /// Custody wallet
    #[command(subcommand)]
    Wallet(WalletCommand),

    /// Governance proposals
    #[command(subcommand)]
    Proposals(ProposalsCommand),

    /// Yield strategies and positions
    #[command(subcommand)]
    Yield(YieldCommand),

    /// Fixed-term investments
    #[command(subcommand)]
    Invest(InvestCommand),

    /// Summarize balance, savings and yield
    Portfolio,
}

#[derive(Subcommand, Debug)]
pub enum PoolsCommand {
    /// List active savings pools
    List,
    /// Create a savings pool
    Create(PoolCreateArgs),
    /// Join a group pool
    Join {
        /// Pool id
        pool: u64,
    },
    /// Deposit into a pool
    Deposit {
        /// Pool id
        pool: u64,
        /// Amount in BTC
        amount: Decimal,
    },
}

#[derive(Parser, Debug)]
pub struct PoolCreateArgs {
    /// Pool name
    pub name: String,

    /// Savings target in BTC
    #[arg(long)]
    pub target: Decimal,

    /// Days from now until the deadline
    #[arg(long, default_value_t = 30)]
    pub days: u32,

    /// Individual or group pool
    #[arg(long, value_enum, default_value_t = PoolKindArg::Individual)]
    pub kind: PoolKindArg,
}

#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// Show deposit address and balance
    Info,
    /// Create a custody wallet
    Create,
    /// Show the wallet balance
    Balance,
    /// Move funds from the wallet into a pool
    Transfer {
        /// Amount in BTC
        amount: Decimal,
        /// Destination pool id
        #[arg(long)]
        pool: u64,
    },
    /// Credit test funds (local replica)
    SimulateDeposit {
        /// Amount in BTC
        amount: Decimal,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProposalsCommand {
    /// List active proposals
    List,
    /// Show one proposal
    Show {
        /// Proposal id
        id: u64,
    },
    /// Vote on a proposal
    Vote {
        /// Proposal id
        id: u64,
        /// Ballot
        #[arg(value_enum)]
        choice: VoteArg,
    },
    /// Submit a proposal
    Create {
        /// Short title
        title: String,
        /// Full description
        #[arg(long)]
        description: String,
        /// Proposal category
        #[arg(long, value_enum, default_value_t = ProposalKindArg::Feature)]
        kind: ProposalKindArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum YieldCommand {
    /// List available strategies
    Strategies,
    /// Stake into a strategy
    Enter {
        /// Strategy id
        strategy: String,
        /// Amount in BTC
        amount: Decimal,
    },
    /// List your positions
    Positions,
    /// Claim accrued yield
    Claim,
    /// Show yield accrued so far
    Current,
    /// Project returns for a hypothetical stake
    Project {
        /// Strategy id
        strategy: String,
        /// Amount in BTC
        amount: Decimal,
        /// Duration in days
        #[arg(long, default_value_t = 365)]
        days: u64,
    },
    /// Show historical performance of a strategy
    Performance {
        /// Strategy id
        strategy: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum InvestCommand {
    /// Lock funds for a fixed term
    Start {
        /// Amount in BTC
        amount: Decimal,
        /// Term in days
        #[arg(long)]
        days: u64,
    },
    /// List your investments
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PoolKindArg {
    Individual,
    Group,
}

impl From<PoolKindArg> for PoolKind {
    fn from(arg: PoolKindArg) -> Self {
        match arg {
            PoolKindArg::Individual => Self::Individual,
            PoolKindArg::Group => Self::Group,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VoteArg {
    For,
    Against,
}

impl From<VoteArg> for VoteChoice {
    fn from(arg: VoteArg) -> Self {
        match arg {
            VoteArg::For => Self::For,
            VoteArg::Against => Self::Against,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProposalKindArg {
    Feature,
    Parameter,
    Treasury,
}

impl From<ProposalKindArg> for ProposalKind {
    fn from(arg: ProposalKindArg) -> Self {
        match arg {
            ProposalKindArg::Feature => Self::NewFeature,
            ProposalKindArg::Parameter => Self::ParameterChange,
            ProposalKindArg::Treasury => Self::TreasurySpend,
        }
    }
}
