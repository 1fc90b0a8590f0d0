//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let cli_session = storage::require_session().await?;
    let session = cli_session.client.bluemix_session();
    let softlayer = cli_session.client.softlayer_session();

    output::field("Username", session.username());
    output::field("Region", Some(session.region().as_str()));
    output::field("Login endpoint", Some(session.login_endpoint().as_str()));
    output::field("SoftLayer endpoint", Some(softlayer.endpoint().as_str()));
    output::field("SoftLayer account", session.softlayer_account_number());
    output::field(
        "IMS user id",
        softlayer.user_id().map(|id| id.to_string()).as_deref(),
    );
    output::field("Saved at", Some(cli_session.saved_at.to_rfc3339().as_str()));

    Ok(())
}
