//! Virtual guest commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use bluemix_provider::{BluemixProvider, VIRTUAL_GUEST};
use provider_core::{Provider, ResourceData, schema};

use super::ensure_found;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct VirtualGuestCommand {
    #[command(subcommand)]
    pub command: VirtualGuestSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VirtualGuestSubcommand {
    /// Order a new virtual guest
    Create(CreateArgs),

    /// Show a guest by id
    Get(IdArgs),

    /// Cancel a guest by id
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub hostname: String,

    #[arg(long)]
    pub domain: String,

    /// Datacenter short name, e.g. dal09
    #[arg(long)]
    pub datacenter: String,

    #[arg(long, default_value_t = 1)]
    pub cores: i64,

    /// Memory in MB
    #[arg(long, default_value_t = 1024)]
    pub memory: i64,

    /// Operating system reference code, e.g. UBUNTU_LATEST
    #[arg(long)]
    pub os_reference_code: String,

    /// Bill monthly instead of hourly
    #[arg(long)]
    pub monthly: bool,

    /// SSH key id to install (repeatable)
    #[arg(long = "ssh-key-id")]
    pub ssh_key_ids: Vec<i64>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// SoftLayer guest id
    pub id: String,
}

impl CreateArgs {
    fn into_data(self) -> ResourceData {
        let mut data = ResourceData::new()
            .with("hostname", self.hostname)
            .with("domain", self.domain)
            .with("datacenter", self.datacenter)
            .with("cores", self.cores)
            .with("memory", self.memory)
            .with("os_reference_code", self.os_reference_code)
            .with("hourly_billing", !self.monthly);
        if !self.ssh_key_ids.is_empty() {
            data.set("ssh_key_ids", self.ssh_key_ids);
        }
        if let Some(notes) = self.notes {
            data.set("notes", notes);
        }
        data
    }
}

pub async fn handle(cmd: VirtualGuestCommand) -> Result<()> {
    let session = storage::require_session().await?;
    let resource = BluemixProvider.resource(&session.client, VIRTUAL_GUEST)?;

    match cmd.command {
        VirtualGuestSubcommand::Create(args) => {
            let mut data = args.into_data();
            schema::prepare(&resource.schema(), &mut data)?;
            resource
                .create(&mut data)
                .await
                .context("Failed to create virtual guest")?;
            output::resource(&data)
        }
        VirtualGuestSubcommand::Get(args) => {
            let data = resource
                .import(&args.id)
                .await
                .context("Failed to read virtual guest")?;
            ensure_found(&data, "Virtual guest", &args.id)?;
            output::resource(&data)
        }
        VirtualGuestSubcommand::Delete(args) => {
            let mut data = ResourceData::with_id(&args.id);
            resource
                .delete(&mut data)
                .await
                .context("Failed to delete virtual guest")?;
            output::success(&format!("Deleted virtual guest {}", args.id));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluemix_provider::resources::VirtualGuestResource;

    fn args() -> CreateArgs {
        CreateArgs {
            hostname: "web1".to_string(),
            domain: "example.com".to_string(),
            datacenter: "dal09".to_string(),
            cores: 2,
            memory: 4096,
            os_reference_code: "UBUNTU_LATEST".to_string(),
            monthly: false,
            ssh_key_ids: vec![11, 12],
            notes: None,
        }
    }

    #[test]
    fn create_args_satisfy_the_schema() {
        let mut data = args().into_data();
        schema::prepare(&VirtualGuestResource::resource_schema(), &mut data).unwrap();
        assert_eq!(data.get_bool("hourly_billing"), Some(true));
        assert_eq!(data.get_list("ssh_key_ids").map(Vec::len), Some(2));
    }

    #[test]
    fn monthly_flag_disables_hourly_billing() {
        let data = CreateArgs {
            monthly: true,
            ssh_key_ids: Vec::new(),
            ..args()
        }
        .into_data();
        assert_eq!(data.get_bool("hourly_billing"), Some(false));
        assert!(data.get("ssh_key_ids").is_none());
    }
}
