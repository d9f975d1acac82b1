//! `invest` subcommands.

use tabled::Tabled;

use crate::adapter::inbound::cli::action::{load, perform, require_signed_in};
use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::domain::{Btc, Investment};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct InvestmentRow {
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Term")]
    term: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Matures")]
    matures: String,
    #[tabled(rename = "Expected")]
    expected: String,
}

fn row(investment: &Investment) -> InvestmentRow {
    InvestmentRow {
        amount: output::btc(investment.amount),
        term: format!("{} days", investment.duration_days),
        started: investment.start_time.format("%Y-%m-%d").to_string(),
        matures: investment.matures_at().format("%Y-%m-%d").to_string(),
        expected: investment
            .expected_return
            .map_or_else(|| "-".to_string(), output::btc),
    }
}

pub async fn start(client: &NuruClient, amount: Btc, days: u64) -> Result<()> {
    require_signed_in(client)?;
    if days == 0 {
        return Err(Error::Action("Term must be at least one day".into()));
    }
    perform(
        client,
        "Starting investment",
        &format!("Invested {} for {days} days", output::btc(amount)),
        client.aggregator().start_investment(amount, days),
    )
    .await
}

pub async fn list(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    load(client, &[Collection::Investments]).await?;
    let investments = client.aggregator().snapshot().investments;
    output::section("Investments");
    output::table(&investments, row, "No investments");
    Ok(())
}
