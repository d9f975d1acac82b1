//! `portfolio` summary.

use crate::adapter::inbound::cli::action::{load, require_signed_in};
use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::error::Result;

pub async fn show(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    load(
        client,
        &[
            Collection::Balance,
            Collection::Pools,
            Collection::Strategies,
            Collection::Positions,
        ],
    )
    .await?;

    let summary = client.aggregator().portfolio();
    if output::is_json() {
        output::json_value("portfolio", &summary);
        return Ok(());
    }

    output::section("Portfolio");
    output::field("Wallet", output::btc(summary.balance));
    output::field(
        "Saved",
        format!(
            "{} across {} pools",
            output::btc(summary.total_saved),
            summary.pool_count
        ),
    );
    output::field("Staked", output::btc(summary.total_staked));
    output::field("Accrued", output::positive(output::btc(summary.accrued_yield)));
    output::field("Claimed", output::btc(summary.claimed_yield));
    output::field("Weighted APY", output::percent(summary.weighted_apy));
    output::field("Net worth", output::highlight(output::btc(summary.net_worth())));
    Ok(())
}
