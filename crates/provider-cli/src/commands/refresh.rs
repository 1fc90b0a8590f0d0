//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs) -> Result<()> {
    let cli_session = storage::require_session().await?;
    let session = cli_session.client.bluemix_session();

    eprintln!("{}", "Refreshing session...".dimmed());

    session
        .refresh()
        .await
        .context("Failed to refresh session")?;

    storage::save_session(session, &cli_session.options)
        .await
        .context("Failed to save refreshed session")?;

    output::success("Session refreshed successfully");
    output::field("Region", Some(session.region().as_str()));

    Ok(())
}
