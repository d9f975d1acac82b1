//! `wallet` subcommands.

use crate::adapter::inbound::cli::action::{load, perform, require_signed_in};
use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::domain::{Btc, PoolId};
use crate::error::{Error, Result};

pub async fn info(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    let pb = output::spinner("Fetching wallet");
    let Some(wallet) = client.aggregator().wallet_info().await else {
        output::spinner_fail(&pb, "Fetching wallet");
        output::hint(&format!(
            "run {} to create one",
            output::highlight("nuru wallet create")
        ));
        return Err(Error::Action("No wallet found".into()));
    };
    pb.finish_and_clear();

    if output::is_json() {
        output::json_value("wallet", &wallet);
        return Ok(());
    }
    output::section("Wallet");
    output::field("Address", &wallet.address);
    output::field("Balance", output::btc(wallet.balance));
    Ok(())
}

pub async fn create(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Creating wallet",
        "Wallet created",
        client.aggregator().create_wallet(),
    )
    .await
}

pub async fn balance(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    load(client, &[Collection::Balance]).await?;
    let balance = client.aggregator().snapshot().user.balance;
    if output::is_json() {
        output::json_value("balance", &serde_json::json!({ "btc": balance }));
        return Ok(());
    }
    output::field("Balance", output::btc(balance));
    Ok(())
}

pub async fn transfer(client: &NuruClient, amount: Btc, pool: u64) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Transferring",
        &format!("Moved {} into pool {pool}", output::btc(amount)),
        client.aggregator().transfer(amount, PoolId::new(pool)),
    )
    .await
}

pub async fn simulate_deposit(client: &NuruClient, amount: Btc) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Simulating deposit",
        &format!("Credited {}", output::btc(amount)),
        client.aggregator().simulate_deposit(amount),
    )
    .await?;
    output::field("Balance", output::btc(client.aggregator().snapshot().user.balance));
    Ok(())
}
