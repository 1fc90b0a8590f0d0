//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use bluemix_session::{Session, SessionOptions};

use crate::output;
use crate::session::{StoredOptions, storage};

/// Unset options fall back to the BM_*, SL_* and legacy BLUEMIX_*,
/// SOFTLAYER_* environment variables.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Bluemix user name
    #[arg(long)]
    pub username: Option<String>,

    /// Bluemix password
    #[arg(long)]
    pub password: Option<String>,

    /// Identity cookie to use instead of a password
    #[arg(long)]
    pub identity_cookie: Option<String>,

    /// Bluemix region, e.g. ng, eu-gb, au-syd
    #[arg(long)]
    pub region: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<String>,

    /// IAM client id used for the IMS token exchange
    #[arg(long)]
    pub iam_client_id: Option<String>,

    /// IAM client secret
    #[arg(long)]
    pub iam_secret: Option<String>,

    /// SoftLayer user name
    #[arg(long)]
    pub softlayer_username: Option<String>,

    /// SoftLayer API key
    #[arg(long)]
    pub softlayer_api_key: Option<String>,

    /// SoftLayer API endpoint
    #[arg(long)]
    pub softlayer_endpoint_url: Option<String>,

    /// SoftLayer account number; acquires an IMS token for it
    #[arg(long)]
    pub softlayer_account_number: Option<String>,

    #[arg(long, hide = true)]
    pub login_endpoint: Option<String>,

    #[arg(long, hide = true)]
    pub iam_endpoint: Option<String>,
}

impl LoginArgs {
    fn into_options(self) -> SessionOptions {
        SessionOptions {
            username: self.username,
            password: self.password,
            identity_cookie: self.identity_cookie,
            region: self.region,
            timeout: self.timeout,
            iam_client_id: self.iam_client_id,
            iam_secret: self.iam_secret,
            softlayer_username: self.softlayer_username,
            softlayer_api_key: self.softlayer_api_key,
            softlayer_endpoint_url: self.softlayer_endpoint_url,
            softlayer_account_number: self.softlayer_account_number,
            login_endpoint: self.login_endpoint,
            iam_endpoint: self.iam_endpoint,
            ..Default::default()
        }
        .with_env_fallback()
    }
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let options = args.into_options();

    eprintln!("{}", "Logging in...".dimmed());

    let session = Session::new(options.clone())
        .await
        .context("Failed to login")?;

    storage::save_session(&session, &StoredOptions::from_options(&options))
        .await
        .context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("Username", session.username());
    output::field("Region", Some(session.region().as_str()));
    output::field("Login endpoint", Some(session.login_endpoint().as_str()));
    if session.softlayer_account_number().is_some() {
        output::field("SoftLayer account", session.softlayer_account_number());
    }

    Ok(())
}
