//! `kubernetes_namespace` resource.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use provider_core::{Resource, ResourceData, Result, SchemaMap};

use crate::client::KubeClient;
use crate::metadata::{expand_metadata, flatten_metadata, metadata_schema};
use crate::types::Namespace;
use crate::wait::{DEFAULT_POLL_INTERVAL, Observed, StateWaiter};

/// How long deletion may stay in `Terminating`.
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A cluster namespace.
#[derive(Debug, Clone)]
pub struct NamespaceResource {
    client: KubeClient,
    poll_interval: Duration,
}

impl NamespaceResource {
    pub fn new(client: KubeClient) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Poll deletion progress at a different interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn resource_schema() -> SchemaMap {
        SchemaMap::from([("metadata", metadata_schema())])
    }
}

#[async_trait]
impl Resource for NamespaceResource {
    fn schema(&self) -> SchemaMap {
        Self::resource_schema()
    }

    #[instrument(skip(self, data))]
    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let namespace = Namespace::new(expand_metadata(data.get_block("metadata")));
        info!(?namespace, "Creating new namespace");

        let out = self.client.create_namespace(&namespace).await?;
        let name = out.metadata.name.unwrap_or_default();
        info!(%name, "Submitted new namespace");

        data.set_id(name);
        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let name = data.require_id()?.to_string();

        match self.client.get_namespace(&name).await {
            Ok(namespace) => {
                debug!(?namespace, "Received namespace");
                data.set("metadata", flatten_metadata(&namespace.metadata));
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(%name, "Removing namespace from state (it is gone)");
                data.clear_id();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let name = data.require_id()?.to_string();

        let mut metadata = expand_metadata(data.get_block("metadata"));
        // The name may have been generated by the server.
        metadata.name = Some(name);
        metadata.generate_name = None;
        let namespace = Namespace::new(metadata);
        info!(?namespace, "Updating namespace");

        let out = self.client.update_namespace(&namespace).await?;
        if let Some(name) = out.metadata.name {
            data.set_id(name);
        }
        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let name = data.require_id()?.to_string();
        info!(%name, "Deleting namespace");

        self.client.delete_namespace(&name).await?;

        StateWaiter::new(&["Terminating"], &[], DELETE_TIMEOUT)
            .with_poll_interval(self.poll_interval)
            .wait(|| {
                let name = name.clone();
                async move {
                    match self.client.get_namespace(&name).await {
                        Ok(namespace) => {
                            debug!(%name, phase = namespace.phase(), "Namespace status received");
                            Ok(Observed::State(namespace.phase().to_string()))
                        }
                        Err(e) if e.is_not_found() => Ok(Observed::Gone),
                        Err(e) => Err(e),
                    }
                }
            })
            .await?;

        info!(%name, "Namespace deleted");
        data.clear_id();
        Ok(())
    }
}
