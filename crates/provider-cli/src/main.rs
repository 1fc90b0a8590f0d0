//! bmx - drive the Bluemix and Kubernetes providers from the command line.
//!
//! A thin wrapper over the provider crates: it authenticates, keeps the
//! session tokens between runs, and performs single resource operations.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{login, logout, namespace, refresh, schema, ssh_key, virtual_guest, whoami};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Login(args) => login::run(args).await,
        Commands::Logout(args) => logout::run(args).await,
        Commands::Refresh(args) => refresh::run(args).await,
        Commands::Whoami(args) => whoami::run(args).await,
        Commands::Schema(args) => schema::run(args),
        Commands::SshKey(cmd) => ssh_key::handle(cmd).await,
        Commands::VirtualGuest(cmd) => virtual_guest::handle(cmd).await,
        Commands::Namespace(cmd) => namespace::handle(cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
