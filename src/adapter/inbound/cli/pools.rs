//! `pools` subcommands.

use chrono::{Duration, Utc};
use tabled::Tabled;

use crate::adapter::inbound::cli::action::{load, perform, require_signed_in};
use crate::adapter::inbound::cli::command::PoolCreateArgs;
use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::domain::deadline::Remaining;
use crate::domain::{Btc, NewPool, PoolId, SavingsPool};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Members")]
    members: usize,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

fn row(pool: &SavingsPool) -> PoolRow {
    PoolRow {
        id: pool.id.value(),
        name: pool.name.clone(),
        kind: pool.kind.to_string(),
        saved: format!(
            "{} / {}",
            output::btc(pool.current_amount),
            output::btc(pool.target_amount)
        ),
        progress: output::percent(pool.progress_percent()),
        members: pool.members.len(),
        deadline: Remaining::until(pool.deadline, Utc::now()).to_string(),
    }
}

pub async fn list(client: &NuruClient) -> Result<()> {
    load(client, &[Collection::Pools]).await?;
    let pools = client.aggregator().snapshot().pools;
    output::section("Savings pools");
    output::table(&pools, row, "No active pools");
    Ok(())
}

pub async fn create(client: &NuruClient, args: &PoolCreateArgs) -> Result<()> {
    require_signed_in(client)?;
    if args.target <= Btc::ZERO {
        return Err(Error::Action("Target amount must be greater than 0".into()));
    }
    let pool = NewPool {
        name: args.name.clone(),
        target_amount: args.target,
        deadline: Utc::now() + Duration::days(i64::from(args.days)),
        kind: args.kind.into(),
    };
    perform(
        client,
        "Creating savings pool",
        &format!("Created pool {}", args.name),
        client.aggregator().create_pool(pool),
    )
    .await
}

pub async fn join(client: &NuruClient, pool: u64) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Joining pool",
        &format!("Joined pool {pool}"),
        client.aggregator().join_pool(PoolId::new(pool)),
    )
    .await
}

pub async fn deposit(client: &NuruClient, pool: u64, amount: Btc) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Depositing",
        &format!("Deposited {} into pool {pool}", output::btc(amount)),
        client.aggregator().deposit(PoolId::new(pool), amount),
    )
    .await?;
    output::field("Balance", output::btc(client.aggregator().snapshot().user.balance));
    Ok(())
}
