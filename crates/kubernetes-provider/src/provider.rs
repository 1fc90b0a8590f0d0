//! The `kubernetes` provider.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use provider_core::error::InvalidInputError;
use provider_core::{
    AccessToken, EndpointUrl, EnvParam, Provider, ResourceData, ResourceMap, Result, Schema,
    SchemaMap,
};

use crate::client::KubeClient;
use crate::namespace::NamespaceResource;

pub const NAMESPACE: &str = "kubernetes_namespace";

/// Kubernetes provider talking to a single API server.
#[derive(Debug, Clone, Default)]
pub struct KubernetesProvider;

impl KubernetesProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for KubernetesProvider {
    type Meta = KubeClient;

    fn name(&self) -> &'static str {
        "kubernetes"
    }

    fn schema(&self) -> SchemaMap {
        SchemaMap::from([
            (
                "host",
                Schema::string("The address of the Kubernetes API server.")
                    .optional()
                    .default_fn(|| EnvParam::KubeHost.from_env().map(Value::String)),
            ),
            (
                "token",
                Schema::string("Bearer token for the API server.")
                    .optional()
                    .sensitive()
                    .default_fn(|| EnvParam::KubeToken.from_env().map(Value::String)),
            ),
        ])
    }

    fn resource_schemas(&self) -> BTreeMap<&'static str, SchemaMap> {
        BTreeMap::from([(NAMESPACE, NamespaceResource::resource_schema())])
    }

    async fn configure(&self, config: &ResourceData) -> Result<KubeClient> {
        let host = config.get_non_empty("host").ok_or_else(|| {
            InvalidInputError::attribute(
                "host",
                format!("is required (or set {})", EnvParam::KubeHost),
            )
        })?;
        let host = EndpointUrl::new(host)?;
        let token = config.get_non_empty("token").map(AccessToken::new);

        info!(%host, "Configured kubernetes provider");
        Ok(KubeClient::new(host, token))
    }

    fn resources(&self, meta: &KubeClient) -> ResourceMap {
        let mut map = ResourceMap::new();
        map.insert(NAMESPACE, Box::new(NamespaceResource::new(meta.clone())));
        map
    }
}
