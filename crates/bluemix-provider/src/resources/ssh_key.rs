//! `bluemix_infrastructure_ssh_key` resource.

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use provider_core::error::ProtocolError;
use provider_core::{Error, Resource, ResourceData, Result, Schema, SchemaMap};

use crate::softlayer::types::{SSH_KEY_SERVICE, SshKey};
use crate::softlayer::{SoftLayerClient, object_id};

pub const SSH_KEY_MASK: &str = "id;label;key;fingerprint;notes;createDate";

/// An SSH public key registered with the SoftLayer account.
#[derive(Debug, Clone)]
pub struct SshKeyResource {
    client: SoftLayerClient,
}

impl SshKeyResource {
    pub fn new(client: SoftLayerClient) -> Self {
        Self { client }
    }

    pub fn resource_schema() -> SchemaMap {
        SchemaMap::from([
            ("label", Schema::string("Descriptive name of the key.").required()),
            (
                "public_key",
                Schema::string("The public half of the key pair.")
                    .required()
                    .force_new(),
            ),
            ("notes", Schema::string("Free-form notes.").optional()),
            (
                "fingerprint",
                Schema::string("Fingerprint computed by SoftLayer.").computed(),
            ),
        ])
    }
}

/// Copy a SoftLayer key into resource state.
pub(crate) fn flatten_ssh_key(key: &SshKey, data: &mut ResourceData) {
    data.set("label", key.label.clone());
    data.set("public_key", key.key.clone());
    data.set("fingerprint", key.fingerprint.clone());
    data.set("notes", key.notes.clone());
}

#[async_trait]
impl Resource for SshKeyResource {
    fn schema(&self) -> SchemaMap {
        Self::resource_schema()
    }

    #[instrument(skip(self, data))]
    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let template = SshKey {
            label: Some(data.require_str("label")?.to_string()),
            key: Some(data.require_str("public_key")?.to_string()),
            notes: data.get_str("notes").map(str::to_string),
            ..Default::default()
        };

        let created: SshKey = self
            .client
            .call(SSH_KEY_SERVICE, None, "createObject", &[template])
            .await?;
        let id = created.id.ok_or_else(|| {
            Error::Protocol(ProtocolError::new(
                200,
                None,
                Some("createObject returned a key without an id".to_string()),
            ))
        })?;

        info!(id, "Created SSH key");
        data.set_id(id.to_string());
        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = object_id(data)?;

        match self
            .client
            .get::<SshKey>(SSH_KEY_SERVICE, Some(id), "getObject", Some(SSH_KEY_MASK))
            .await
        {
            Ok(key) => {
                flatten_ssh_key(&key, data);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(id, "Removing SSH key from state (it is gone)");
                data.clear_id();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = object_id(data)?;
        let template = SshKey {
            label: Some(data.require_str("label")?.to_string()),
            notes: Some(data.get_str("notes").unwrap_or_default().to_string()),
            ..Default::default()
        };

        let edited: bool = self
            .client
            .call(SSH_KEY_SERVICE, Some(id), "editObject", &[template])
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
            .get::<bool>(SSH_KEY_SERVICE, Some(id), "deleteObject", None)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Err(rejected("deleteObject", id)),
            Err(e) if e.is_not_found() => warn!(id, "SSH key already deleted"),
            Err(e) => return Err(e),
        }

        info!(id, "Deleted SSH key");
        data.clear_id();
        Ok(())
    }
}

/// SoftLayer answered `false` to a mutating call.
pub(crate) fn rejected(method: &str, id: i64) -> Error {
    Error::Protocol(ProtocolError::new(
        200,
        None,
        Some(format!("{method} on {id} was not applied")),
    ))
}
