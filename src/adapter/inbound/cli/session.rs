//! `login`, `logout`, `status` and `register`.

use crate::adapter::inbound::cli::action::{perform, require_signed_in};
use crate::adapter::inbound::cli::output;
use crate::application::{NuruClient, SessionStatus};
use crate::error::{Error, Result};

pub async fn login(client: &NuruClient) -> Result<()> {
    if client.session().status() == SessionStatus::Authenticated {
        output::success("Already signed in");
    } else {
        let pb = output::spinner("Signing in");
        match client.sign_in().await {
            Ok(_) => output::spinner_success(&pb, "Signed in"),
            Err(e) => {
                output::spinner_fail(&pb, "Sign-in failed");
                return Err(e);
            }
        }
    }

    if let Some(error) = client.aggregator().error() {
        return Err(Error::Action(error.message));
    }
    let user = client.aggregator().snapshot().user;
    if let Some(principal) = &user.principal {
        output::field("Principal", principal);
    }
    if !user.is_registered {
        output::hint(&format!(
            "run {} to create your account",
            output::highlight("nuru register")
        ));
    }
    Ok(())
}

pub async fn logout(client: &NuruClient) -> Result<()> {
    client.sign_out().await;
    output::success("Signed out");
    Ok(())
}

pub fn status(client: &NuruClient) -> Result<()> {
    let snapshot = client.aggregator().snapshot();
    if output::is_json() {
        output::json_value(
            "status",
            &serde_json::json!({
                "session": client.session().status(),
                "user": snapshot.user,
                "error": snapshot.error,
            }),
        );
        return Ok(());
    }

    output::section("Session");
    let user = &snapshot.user;
    match &user.principal {
        Some(principal) => {
            output::field("Principal", principal);
            output::field(
                "Registered",
                if user.is_registered { "yes" } else { "no" },
            );
            output::field("Balance", output::btc(user.balance));
            if let Some(registered_at) = user.profile.as_ref().and_then(|p| p.registered_at) {
                output::field("Member since", registered_at.format("%Y-%m-%d"));
            }
        }
        None => {
            output::field("Principal", output::muted("not signed in"));
            output::hint(&format!("run {} to sign in", output::highlight("nuru login")));
        }
    }
    if let Some(error) = &snapshot.error {
        output::warning(&error.message);
    }
    Ok(())
}

pub async fn register(client: &NuruClient) -> Result<()> {
    require_signed_in(client)?;
    perform(
        client,
        "Registering",
        "Registered",
        client.aggregator().register(),
    )
    .await
}
