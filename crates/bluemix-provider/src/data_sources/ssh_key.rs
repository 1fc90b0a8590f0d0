//! `bluemix_infrastructure_ssh_key` data source.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use provider_core::error::InvalidInputError;
use provider_core::{DataSource, ResourceData, Result, Schema, SchemaMap};

use crate::resources::ssh_key::{SSH_KEY_MASK, flatten_ssh_key};
use crate::softlayer::SoftLayerClient;
use crate::softlayer::types::{ACCOUNT_SERVICE, SshKey};

/// Looks up an account SSH key by label.
#[derive(Debug, Clone)]
pub struct SshKeyDataSource {
    client: SoftLayerClient,
}

impl SshKeyDataSource {
    pub fn new(client: SoftLayerClient) -> Self {
        Self { client }
    }

    pub fn data_source_schema() -> SchemaMap {
        SchemaMap::from([
            ("label", Schema::string("Label of the key to find.").required()),
            (
                "most_recent",
                Schema::bool("Pick the newest key when several share the label.")
                    .optional()
                    .default_fn(|| Some(Value::Bool(false))),
            ),
            ("public_key", Schema::string("The public key.").computed()),
            ("fingerprint", Schema::string("Key fingerprint.").computed()),
            ("notes", Schema::string("Key notes.").computed()),
        ])
    }
}

/// Pick the key matching `label`.
///
/// Several matches are an error unless `most_recent` is set, in which case
/// the key with the latest `createDate` wins.
fn select_key(keys: Vec<SshKey>, label: &str, most_recent: bool) -> Result<SshKey> {
    let mut matches: Vec<SshKey> = keys
        .into_iter()
        .filter(|k| k.label.as_deref() == Some(label))
        .collect();

    if matches.len() > 1 && !most_recent {
        return Err(InvalidInputError::Other {
            message: format!(
                "{} SSH keys are labelled {label:?}; set most_recent to pick the newest",
                matches.len()
            ),
        }
        .into());
    }

    matches.sort_by_key(|k| k.create_date);
    matches.pop().ok_or_else(|| {
        InvalidInputError::Other {
            message: format!("no SSH key found with label {label:?}"),
        }
        .into()
    })
}

#[async_trait]
impl DataSource for SshKeyDataSource {
    fn schema(&self) -> SchemaMap {
        Self::data_source_schema()
    }

    #[instrument(skip(self, data))]
    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let label = data.require_str("label")?.to_string();
        let most_recent = data.get_bool("most_recent").unwrap_or(false);

        let keys: Vec<SshKey> = self
            .client
            .get(ACCOUNT_SERVICE, None, "getSshKeys", Some(SSH_KEY_MASK))
            .await?;
        debug!(count = keys.len(), "Fetched account SSH keys");

        let key = select_key(keys, &label, most_recent)?;
        if let Some(id) = key.id {
            data.set_id(id.to_string());
        }
        flatten_ssh_key(&key, data);
        Ok(())
    }
}
