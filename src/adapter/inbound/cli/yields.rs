//! `yield` subcommands.

use tabled::Tabled;

use crate::adapter::inbound::cli::action::{failure, load, perform, require_signed_in};
use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::domain::{Btc, StrategyId, UserPosition, YieldStrategy};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct StrategyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "APY")]
    apy: String,
    #[tabled(rename = "Minimum")]
    minimum: String,
    #[tabled(rename = "Risk")]
    risk: &'static str,
}

fn strategy_row(strategy: &YieldStrategy) -> StrategyRow {
    StrategyRow {
        id: strategy.id.to_string(),
        name: strategy.name.clone(),
        apy: output::percent(strategy.base_apy),
        minimum: output::btc(strategy.min_amount),
        risk: strategy.risk.as_str(),
    }
}

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Staked")]
    amount: String,
    #[tabled(rename = "Accrued")]
    accrued: String,
    #[tabled(rename = "Claimed")]
    claimed: String,
    #[tabled(rename = "Since")]
    since: String,
}

fn position_row(position: &UserPosition) -> PositionRow {
    PositionRow {
        strategy: position.strategy_id.to_string(),
        amount: output::btc(position.amount),
        accrued: output::btc(position.current_yield),
        claimed: output::btc(position.claimed_yield),
        since: position.entry_time.format("%Y-%m-%d").to_string(),
    }
}

pub async fn strategies(client: &NuruClient) -> Result<()> {
    load(client, &[Collection::Strategies]).await?;
    let strategies: Vec<YieldStrategy> = client
        .aggregator()
        .snapshot()
        .strategies
        .into_iter()
        .filter(|s| s.is_active)
        .collect();
    output::section("Yield strategies");
    output::table(&strategies, strategy_row, "No strategies available");
    Ok(())
}

pub async fn enter(client: &NuruClient, strategy: &str, amount: Btc) -> Result<()> {
    require_signed_in(client)?;
    let strategy = StrategyId::new(strategy);
    perform(
        client,
        "Entering position",
        &format!("Staked {} in {strategy}", output::btc(amount)),
        client.aggregator().enter_position(&strategy, amount),
    )
    .await
}

pub async fn positions(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    load(client, &[Collection::Positions]).await?;
    let positions = client.aggregator().snapshot().positions;
    output::section("Positions");
    output::table(&positions, position_row, "No open positions");
    Ok(())
}

pub async fn claim(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    let pb = output::spinner("Claiming yields");
    let claimed = client.aggregator().claim_yields().await;
    if client.aggregator().error().is_some() {
        output::spinner_fail(&pb, "Claiming yields");
        return Err(failure(client));
    }
    if claimed > Btc::ZERO {
        output::spinner_success(&pb, &format!("Claimed {}", output::btc(claimed)));
    } else {
        pb.finish_and_clear();
        output::note("Nothing to claim");
    }
    Ok(())
}

pub async fn current(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    let accrued = client.aggregator().calculate_current_yield().await;
    output::field("Accrued yield", output::positive(output::btc(accrued)));
    Ok(())
}

pub async fn project(client: &NuruClient, strategy: &str, amount: Btc, days: u64) -> Result<()> {
    if amount <= Btc::ZERO {
        return Err(Error::Action("Amount must be greater than 0".into()));
    }
    let projected = client
        .aggregator()
        .project_returns(amount, &StrategyId::new(strategy), days)
        .await;
    output::field("Strategy", strategy);
    output::field("Stake", output::btc(amount));
    output::field("Duration", format!("{days} days"));
    output::field("Projected", output::positive(output::btc(projected)));
    Ok(())
}

pub async fn performance(client: &NuruClient, strategy: &str) -> Result<()> {
    let performance = client
        .aggregator()
        .strategy_performance(&StrategyId::new(strategy))
        .await;
    output::field("Strategy", strategy);
    output::field("Performance", output::percent(performance));
    Ok(())
}
