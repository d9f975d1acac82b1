//! Route a parsed command line to its handler.

use crate::adapter::inbound::cli::command::{
    Cli, Commands, InvestCommand, PoolsCommand, ProposalsCommand, WalletCommand, YieldCommand,
};
use crate::adapter::inbound::cli::{invest, pools, portfolio, proposals, session, wallet, yields};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_client;
use crate::infrastructure::config::settings::Config;

/// Execute one command against a freshly built client.
///
/// Every command except `logout` first restores the persisted session so
/// identity-bound calls carry the signed-in principal.
pub async fn execute(cli: Cli, config: &Config) -> Result<()> {
    let client = build_client(config)?;

    if matches!(cli.command, Commands::Logout) {
        return session::logout(&client).await;
    }
    client.restore().await?;

    match cli.command {
        Commands::Login => session::login(&client).await,
        Commands::Logout => session::logout(&client).await,
        Commands::Status => session::status(&client),
        Commands::Register => session::register(&client).await,
        Commands::Pools(command) => match command {
            PoolsCommand::List => pools::list(&client).await,
            PoolsCommand::Create(args) => pools::create(&client, &args).await,
            PoolsCommand::Join { pool } => pools::join(&client, pool).await,
            PoolsCommand::Deposit { pool, amount } => pools::deposit(&client, pool, amount).await,
        },
        Commands::Wallet(command) => match command {
            WalletCommand::Info => wallet::info(&client).await,
            WalletCommand::Create => wallet::create(&client).await,
            WalletCommand::Balance => wallet::balance(&client).await,
            WalletCommand::Transfer { amount, pool } => {
                wallet::transfer(&client, amount, pool).await
            }
            WalletCommand::SimulateDeposit { amount } => {
                wallet::simulate_deposit(&client, amount).await
            }
        },
        Commands::Proposals(command) => match command {
            ProposalsCommand::List => proposals::list(&client).await,
            ProposalsCommand::Show { id } => proposals::show(&client, id).await,
            ProposalsCommand::Vote { id, choice } => {
                proposals::vote(&client, id, choice.into()).await
            }
            ProposalsCommand::Create {
                title,
                description,
                kind,
            } => proposals::create(&client, &title, &description, kind.into()).await,
        },
        Commands::Yield(command) => match command {
            YieldCommand::Strategies => yields::strategies(&client).await,
            YieldCommand::Enter { strategy, amount } => {
                yields::enter(&client, &strategy, amount).await
            }
            YieldCommand::Positions => yields::positions(&client).await,
            YieldCommand::Claim => yields::claim(&client).await,
            YieldCommand::Current => yields::current(&client).await,
            YieldCommand::Project {
                strategy,
                amount,
                days,
            } => yields::project(&client, &strategy, amount, days).await,
            YieldCommand::Performance { strategy } => {
                yields::performance(&client, &strategy).await
            }
        },
        Commands::Invest(command) => match command {
            InvestCommand::Start { amount, days } => invest::start(&client, amount, days).await,
            InvestCommand::List => invest::list(&client).await,
        },
        Commands::Portfolio => portfolio::show(&client).await,
    }
}
