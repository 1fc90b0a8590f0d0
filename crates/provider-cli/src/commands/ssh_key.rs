//! SSH key commands.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use bluemix_provider::{BluemixProvider, SSH_KEY};
use provider_core::{Provider, Resource, ResourceData, schema};

use super::ensure_found;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct SshKeyCommand {
    #[command(subcommand)]
    pub command: SshKeySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SshKeySubcommand {
    /// Upload a public key
    Create(CreateArgs),

    /// Show a key by id
    Get(IdArgs),

    /// Change a key's label or notes
    Update(UpdateArgs),

    /// Delete a key by id
    Delete(IdArgs),

    /// Find a key by label
    Lookup(LookupArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Descriptive name of the key
    #[arg(long)]
    pub label: String,

    /// Public key file (use - for stdin)
    #[arg(long)]
    pub public_key: String,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// SoftLayer key id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// SoftLayer key id
    pub id: String,

    /// New label
    #[arg(long)]
    pub label: Option<String>,

    /// New notes (empty string clears them)
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Label to search for
    #[arg(long)]
    pub label: String,

    /// Pick the newest key when several share the label
    #[arg(long)]
    pub most_recent: bool,
}

pub async fn handle(cmd: SshKeyCommand) -> Result<()> {
    let session = storage::require_session().await?;
    let provider = BluemixProvider;

    match cmd.command {
        SshKeySubcommand::Create(args) => {
            let resource = provider.resource(&session.client, SSH_KEY)?;
            create(resource.as_ref(), args).await
        }
        SshKeySubcommand::Get(args) => {
            let resource = provider.resource(&session.client, SSH_KEY)?;
            let data = resource
                .import(&args.id)
                .await
                .context("Failed to read SSH key")?;
            ensure_found(&data, "SSH key", &args.id)?;
            output::resource(&data)
        }
        SshKeySubcommand::Update(args) => {
            let resource = provider.resource(&session.client, SSH_KEY)?;
            update(resource.as_ref(), args).await
        }
        SshKeySubcommand::Delete(args) => {
            let resource = provider.resource(&session.client, SSH_KEY)?;
            let mut data = ResourceData::with_id(&args.id);
            resource
                .delete(&mut data)
                .await
                .context("Failed to delete SSH key")?;
            output::success(&format!("Deleted SSH key {}", args.id));
            Ok(())
        }
        SshKeySubcommand::Lookup(args) => {
            let data_source = provider.data_source(&session.client, SSH_KEY)?;
            let mut data = ResourceData::new()
                .with("label", args.label)
                .with("most_recent", args.most_recent);
            schema::prepare(&data_source.schema(), &mut data)?;
            data_source
                .read(&mut data)
                .await
                .context("Failed to look up SSH key")?;
            output::resource(&data)
        }
    }
}

fn read_public_key(source: &str) -> Result<String> {
    let key = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).context("Failed to read public key file")?
    };
    Ok(key.trim().to_string())
}

async fn create(resource: &dyn Resource, args: CreateArgs) -> Result<()> {
    let mut data = ResourceData::new()
        .with("label", args.label)
        .with("public_key", read_public_key(&args.public_key)?);
    if let Some(notes) = args.notes {
        data.set("notes", notes);
    }

    schema::prepare(&resource.schema(), &mut data)?;
    resource
        .create(&mut data)
        .await
        .context("Failed to create SSH key")?;

    output::resource(&data)
}

async fn update(resource: &dyn Resource, args: UpdateArgs) -> Result<()> {
    let mut data = resource
        .import(&args.id)
        .await
        .context("Failed to read SSH key")?;
    ensure_found(&data, "SSH key", &args.id)?;

    if let Some(label) = args.label {
        data.set("label", label);
    }
    if let Some(notes) = args.notes {
        data.set("notes", notes);
    }

    resource
        .update(&mut data)
        .await
        .context("Failed to update SSH key")?;

    output::resource(&data)
}
