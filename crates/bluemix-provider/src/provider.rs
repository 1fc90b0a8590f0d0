//! The `bluemix` provider.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use provider_core::{
    DataSourceMap, EnvParam, Provider, ResourceData, ResourceMap, Result, Schema, SchemaMap,
};

use crate::config::{ClientSession, Config};
use crate::data_sources::SshKeyDataSource;
use crate::resources::{SshKeyResource, VirtualGuestResource};

pub const SSH_KEY: &str = "bluemix_infrastructure_ssh_key";
pub const VIRTUAL_GUEST: &str = "bluemix_infrastructure_virtual_guest";

fn env_default(param: EnvParam) -> Option<Value> {
    param.from_env().map(Value::String)
}

/// Bluemix infrastructure provider backed by the SoftLayer API.
#[derive(Debug, Clone, Default)]
pub struct BluemixProvider;

impl BluemixProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for BluemixProvider {
    type Meta = ClientSession;

    fn name(&self) -> &'static str {
        "bluemix"
    }

    fn schema(&self) -> SchemaMap {
        SchemaMap::from([
            (
                "username",
                Schema::string("The Bluemix user name.")
                    .optional()
                    .default_fn(|| env_default(EnvParam::Username)),
            ),
            (
                "password",
                Schema::string("The Bluemix password.")
                    .optional()
                    .sensitive()
                    .default_fn(|| env_default(EnvParam::Password)),
            ),
            (
                "region",
                Schema::string("The Bluemix region, for example 'ng'.")
                    .required()
                    .default_fn(|| env_default(EnvParam::Region)),
            ),
            (
                "timeout",
                Schema::int("Timeout in seconds for Bluemix API calls.").optional(),
            ),
            (
                "softlayer_username",
                Schema::string("The SoftLayer user name.").optional(),
            ),
            (
                "softlayer_api_key",
                Schema::string("The API key for SoftLayer API operations.")
                    .optional()
                    .sensitive(),
            ),
            (
                "softlayer_endpoint_url",
                Schema::string("The endpoint URL for the SoftLayer API.").optional(),
            ),
            (
                "softlayer_timeout",
                Schema::int("Timeout in seconds for SoftLayer API calls.").optional(),
            ),
            (
                "softlayer_account_number",
                Schema::string("The SoftLayer IMS account number.")
                    .optional()
                    .default_fn(|| env_default(EnvParam::SoftLayerAccountNumber)),
            ),
        ])
    }

    fn resource_schemas(&self) -> BTreeMap<&'static str, SchemaMap> {
        BTreeMap::from([
            (SSH_KEY, SshKeyResource::resource_schema()),
            (VIRTUAL_GUEST, VirtualGuestResource::resource_schema()),
        ])
    }

    fn data_source_schemas(&self) -> BTreeMap<&'static str, SchemaMap> {
        BTreeMap::from([(SSH_KEY, SshKeyDataSource::data_source_schema())])
    }

    async fn configure(&self, config: &ResourceData) -> Result<ClientSession> {
        let config = Config::from_resource_data(config);
        let session = config.client_session().await?;
        info!(region = %session.bluemix_session().region(), "Configured bluemix provider");
        Ok(session)
    }

    fn resources(&self, meta: &ClientSession) -> ResourceMap {
        let client = meta.softlayer_client();
        let mut map = ResourceMap::new();
        map.insert(SSH_KEY, Box::new(SshKeyResource::new(client.clone())));
        map.insert(VIRTUAL_GUEST, Box::new(VirtualGuestResource::new(client)));
        map
    }

    fn data_sources(&self, meta: &ClientSession) -> DataSourceMap {
        let mut map = DataSourceMap::new();
        map.insert(SSH_KEY, Box::new(SshKeyDataSource::new(meta.softlayer_client())));
        map
    }
}
