//! `proposals` subcommands.

use chrono::Utc;
use tabled::Tabled;

use crate::adapter::inbound::cli::action::{load, perform, require_signed_in};
use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::domain::deadline::Remaining;
use crate::domain::{NewProposal, Proposal, ProposalId, ProposalKind, VoteChoice};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct ProposalRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "For")]
    votes_for: String,
    #[tabled(rename = "Against")]
    votes_against: String,
    #[tabled(rename = "Voting")]
    remaining: String,
}

fn row(proposal: &Proposal) -> ProposalRow {
    let share = proposal.vote_share();
    ProposalRow {
        id: proposal.id.value(),
        title: proposal.title.clone(),
        kind: proposal.kind.as_str(),
        status: proposal.status.as_str(),
        votes_for: format!("{} ({})", proposal.votes_for, output::percent(share.for_percent)),
        votes_against: format!(
            "{} ({})",
            proposal.votes_against,
            output::percent(share.against_percent)
        ),
        remaining: Remaining::until(proposal.voting_deadline, Utc::now()).to_string(),
    }
}

pub async fn list(client: &NuruClient) -> Result<()> {
    load(client, &[Collection::Proposals]).await?;
    let proposals = client.aggregator().snapshot().proposals;
    output::section("Active proposals");
    output::table(&proposals, row, "No active proposals");
    Ok(())
}

pub async fn show(client: &NuruClient, id: u64) -> Result<()> {
    let pb = output::spinner("Fetching proposal");
    let Some(proposal) = client.aggregator().proposal(ProposalId::new(id)).await else {
        output::spinner_fail(&pb, "Fetching proposal");
        return Err(Error::Action(format!("Proposal {id} not found")));
    };
    pb.finish_and_clear();

    if output::is_json() {
        output::json_value("proposal", &proposal);
        return Ok(());
    }
    let share = proposal.vote_share();
    output::section(&proposal.title);
    output::field("ID", proposal.id);
    output::field("Proposer", &proposal.proposer);
    output::field("Kind", proposal.kind);
    output::field("Status", proposal.status);
    output::field(
        "Votes",
        format!(
            "{} for ({}), {} against ({})",
            proposal.votes_for,
            output::percent(share.for_percent),
            proposal.votes_against,
            output::percent(share.against_percent)
        ),
    );
    output::field("Created", proposal.created_at.format("%Y-%m-%d %H:%M"));
    output::field(
        "Voting",
        Remaining::until(proposal.voting_deadline, Utc::now()),
    );
    output::section("Description");
    output::note(&proposal.description);
    Ok(())
}

pub async fn vote(client: &NuruClient, id: u64, choice: VoteChoice) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Submitting vote",
        &format!("Voted {choice} on proposal {id}"),
        client.aggregator().vote(ProposalId::new(id), choice),
    )
    .await
}

pub async fn create(
    client: &NuruClient,
    title: &str,
    description: &str,
    kind: ProposalKind,
) -> Result<()> {
    require_signed_in(client)?;
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(Error::Action("Title and description are required".into()));
    }
    let proposal = NewProposal {
        title: title.to_string(),
        description: description.to_string(),
        kind,
    };
    perform(
        client,
        "Creating proposal",
        "Proposal submitted",
        client.aggregator().create_proposal(proposal),
    )
    .await
}
