//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::login::LoginArgs;
use crate::commands::logout::LogoutArgs;
use crate::commands::namespace::NamespaceCommand;
use crate::commands::refresh::RefreshArgs;
use crate::commands::schema::SchemaArgs;
use crate::commands::ssh_key::SshKeyCommand;
use crate::commands::virtual_guest::VirtualGuestCommand;
use crate::commands::whoami::WhoamiArgs;

/// Manage Bluemix infrastructure and Kubernetes namespaces.
#[derive(Parser, Debug)]
#[command(name = "bmx")]
#[command(author, version = env!("BMX_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with Bluemix and store the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout(LogoutArgs),

    /// Refresh the stored session tokens
    Refresh(RefreshArgs),

    /// Display the stored session
    Whoami(WhoamiArgs),

    /// Print a provider's configuration and resource schemas as JSON
    Schema(SchemaArgs),

    /// Manage SoftLayer SSH keys
    SshKey(SshKeyCommand),

    /// Manage SoftLayer virtual guests
    VirtualGuest(VirtualGuestCommand),

    /// Manage Kubernetes namespaces
    Namespace(NamespaceCommand),
}
