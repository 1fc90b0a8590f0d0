//! `bluemix_infrastructure_virtual_guest` resource.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument, warn};

use provider_core::error::{InvalidInputError, ProtocolError};
use provider_core::{Error, Resource, ResourceData, Result, Schema, SchemaMap, ValueType};

use super::ssh_key::rejected;
use crate::softlayer::types::{IdRef, Location, VIRTUAL_GUEST_SERVICE, VirtualGuest};
use crate::softlayer::{SoftLayerClient, object_id};

pub const VIRTUAL_GUEST_MASK: &str = "id;hostname;domain;startCpus;maxMemory;hourlyBillingFlag;\
     operatingSystemReferenceCode;datacenter.name;sshKeys.id;notes;\
     primaryIpAddress;primaryBackendIpAddress";

/// A SoftLayer virtual server.
#[derive(Debug, Clone)]
pub struct VirtualGuestResource {
    client: SoftLayerClient,
}

impl VirtualGuestResource {
    pub fn new(client: SoftLayerClient) -> Self {
        Self { client }
    }

    pub fn resource_schema() -> SchemaMap {
        SchemaMap::from([
            ("hostname", Schema::string("Host name of the guest.").required()),
            ("domain", Schema::string("Domain of the guest.").required()),
            (
                "datacenter",
                Schema::string("Datacenter short name, e.g. dal09.")
                    .required()
                    .force_new(),
            ),
            (
                "cores",
                Schema::int("Number of CPU cores.").required().force_new(),
            ),
            (
                "memory",
                Schema::int("Memory in MB.").required().force_new(),
            ),
            (
                "os_reference_code",
                Schema::string("Operating system reference code, e.g. UBUNTU_LATEST.")
                    .required()
                    .force_new(),
            ),
            (
                "hourly_billing",
                Schema::bool("Bill hourly instead of monthly.")
                    .optional()
                    .force_new()
                    .default_fn(|| Some(Value::Bool(true))),
            ),
            (
                "ssh_key_ids",
                Schema::list_of(ValueType::Int, "SSH key ids to install on the guest.")
                    .optional()
                    .force_new(),
            ),
            ("notes", Schema::string("Free-form notes.").optional()),
            (
                "ipv4_address",
                Schema::string("Public IPv4 address.").computed(),
            ),
            (
                "ipv4_address_private",
                Schema::string("Private IPv4 address.").computed(),
            ),
        ])
    }

    fn template(data: &ResourceData) -> std::result::Result<VirtualGuest, InvalidInputError> {
        let ssh_keys = data
            .get_list("ssh_key_ids")
            .map(|ids| {
                ids.iter()
                    .map(|id| {
                        id.as_i64().map(|id| IdRef { id }).ok_or_else(|| {
                            InvalidInputError::attribute("ssh_key_ids", "expected int")
                        })
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(VirtualGuest {
            hostname: Some(data.require_str("hostname")?.to_string()),
            domain: Some(data.require_str("domain")?.to_string()),
            start_cpus: Some(data.require_i64("cores")?),
            max_memory: Some(data.require_i64("memory")?),
            hourly_billing_flag: Some(data.get_bool("hourly_billing").unwrap_or(true)),
            local_disk_flag: Some(true),
            operating_system_reference_code: Some(
                data.require_str("os_reference_code")?.to_string(),
            ),
            datacenter: Some(Location {
                name: data.require_str("datacenter")?.to_string(),
            }),
            ssh_keys,
            notes: data.get_str("notes").map(str::to_string),
            ..Default::default()
        })
    }
}

fn flatten_guest(guest: &VirtualGuest, data: &mut ResourceData) {
    data.set("hostname", guest.hostname.clone());
    data.set("domain", guest.domain.clone());
    data.set("cores", guest.start_cpus);
    data.set("memory", guest.max_memory);
    data.set("hourly_billing", guest.hourly_billing_flag);
    data.set(
        "os_reference_code",
        guest.operating_system_reference_code.clone(),
    );
    data.set(
        "datacenter",
        guest.datacenter.as_ref().map(|dc| dc.name.clone()),
    );
    if let Some(keys) = &guest.ssh_keys {
        data.set(
            "ssh_key_ids",
            keys.iter().map(|k| Value::from(k.id)).collect::<Vec<_>>(),
        );
    }
    data.set("notes", guest.notes.clone());
    data.set("ipv4_address", guest.primary_ip_address.clone());
    data.set(
        "ipv4_address_private",
        guest.primary_backend_ip_address.clone(),
    );
}

#[async_trait]
impl Resource for VirtualGuestResource {
    fn schema(&self) -> SchemaMap {
        Self::resource_schema()
    }

    #[instrument(skip(self, data))]
    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let template = Self::template(data)?;

        let created: VirtualGuest = self
            .client
            .call(VIRTUAL_GUEST_SERVICE, None, "createObject", &[template])
            .await?;
        let id = created.id.ok_or_else(|| {
            Error::Protocol(ProtocolError::new(
                200,
                None,
                Some("createObject returned a guest without an id".to_string()),
            ))
        })?;

        info!(id, "Created virtual guest");
        data.set_id(id.to_string());
        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = object_id(data)?;

        match self
            .client
            .get::<VirtualGuest>(
                VIRTUAL_GUEST_SERVICE,
                Some(id),
                "getObject",
                Some(VIRTUAL_GUEST_MASK),
            )
            .await
        {
            Ok(guest) => {
                flatten_guest(&guest, data);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(id, "Removing virtual guest from state (it is gone)");
                data.clear_id();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = object_id(data)?;
        let template = VirtualGuest {
            hostname: Some(data.require_str("hostname")?.to_string()),
            domain: Some(data.require_str("domain")?.to_string()),
            notes: Some(data.get_str("notes").unwrap_or_default().to_string()),
            ..Default::default()
        };

        let edited: bool = self
            .client
            .call(VIRTUAL_GUEST_SERVICE, Some(id), "editObject", &[template])
            .await?;
        if !edited {
            return Err(rejected("editObject", id));
        }

        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = object_id(data)?;

        match self
            .client
            .get::<bool>(VIRTUAL_GUEST_SERVICE, Some(id), "deleteObject", None)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Err(rejected("deleteObject", id)),
            Err(e) if e.is_not_found() => warn!(id, "Virtual guest already deleted"),
            Err(e) => return Err(e),
        }

        info!(id, "Deleted virtual guest");
        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ResourceData {
        ResourceData::new()
            .with("hostname", "web1")
            .with("domain", "example.com")
            .with("datacenter", "dal09")
            .with("cores", 2)
            .with("memory", 4096)
            .with("os_reference_code", "UBUNTU_LATEST")
            .with("ssh_key_ids", json!([11, 12]))
    }

    #[test]
    fn template_from_config() {
        let guest = VirtualGuestResource::template(&config()).unwrap();
        assert_eq!(guest.start_cpus, Some(2));
        assert_eq!(guest.max_memory, Some(4096));
        assert_eq!(guest.hourly_billing_flag, Some(true));
        assert_eq!(guest.datacenter.unwrap().name, "dal09");
        assert_eq!(
            guest.ssh_keys.unwrap().iter().map(|k| k.id).collect::<Vec<_>>(),
            vec![11, 12]
        );
    }

    #[test]
    fn template_requires_hardware_attributes() {
        let mut data = config();
        data.remove("cores");
        let err = VirtualGuestResource::template(&data).unwrap_err();
        assert!(err.to_string().contains("cores"));
    }

    #[test]
    fn flatten_sets_computed_addresses() {
        let guest = VirtualGuest {
            id: Some(1),
            hostname: Some("web1".to_string()),
            primary_ip_address: Some("169.45.1.2".to_string()),
            primary_backend_ip_address: Some("10.0.0.2".to_string()),
            ..Default::default()
        };
        let mut data = ResourceData::with_id("1");
        flatten_guest(&guest, &mut data);
        assert_eq!(data.get_str("ipv4_address"), Some("169.45.1.2"));
        assert_eq!(data.get_str("ipv4_address_private"), Some("10.0.0.2"));
        assert!(data.get("ssh_key_ids").is_none());
    }

    #[test]
    fn hourly_billing_defaults_to_true() {
        let schema = VirtualGuestResource::resource_schema();
        let default = schema["hourly_billing"].default.unwrap();
        assert_eq!(default(), Some(Value::Bool(true)));
    }
}
