//! Helpers shared by the command handlers.

use std::future::Future;

use crate::adapter::inbound::cli::output;
use crate::application::{Collection, NuruClient};
use crate::error::{Error, Result};

const NOT_SIGNED_IN: &str = "Not signed in. Run `nuru login` first.";

/// Fail unless a session is active.
pub fn require_signed_in(client: &NuruClient) -> Result<()> {
    if client.session().is_authenticated() {
        Ok(())
    } else {
        Err(Error::Action(NOT_SIGNED_IN.into()))
    }
}

/// Run a mutating action behind a spinner and turn its outcome into a
/// command result. Failures carry the aggregator's error message.
pub async fn perform(
    client: &NuruClient,
    label: &str,
    done: &str,
    action: impl Future<Output = bool>,
) -> Result<()> {
    let pb = output::spinner(label);
    if action.await {
        output::spinner_success(&pb, done);
        Ok(())
    } else {
        output::spinner_fail(&pb, label);
        Err(failure(client))
    }
}

/// Error describing the last failed action.
pub fn failure(client: &NuruClient) -> Error {
    let message = client
        .aggregator()
        .error()
        .map_or_else(|| "Action failed".to_string(), |e| e.message);
    Error::Action(message)
}

/// Refresh collections for display. Fails when nothing could be loaded.
pub async fn load(client: &NuruClient, collections: &[Collection]) -> Result<()> {
    let pb = output::spinner("Loading");
    let aggregator = client.aggregator();
    let results =
        futures_util::future::join_all(collections.iter().map(|c| aggregator.refresh(*c))).await;
    pb.finish_and_clear();

    let failed: Vec<&str> = collections
        .iter()
        .zip(&results)
        .filter(|(_, ok)| !**ok)
        .map(|(c, _)| c.as_str())
        .collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::Action(format!("Failed to load {}", failed.join(", "))))
    }
}
