//! Provider trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::data::ResourceData;
use crate::error::InvalidInputError;
use crate::schema::{self, SchemaMap};
use crate::Result;

use super::{DataSource, Resource};

/// Resources keyed by type name.
pub type ResourceMap = BTreeMap<&'static str, Box<dyn Resource>>;

/// Data sources keyed by type name.
pub type DataSourceMap = BTreeMap<&'static str, Box<dyn DataSource>>;

/// A provider: a configuration schema plus the resource types it manages.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Client handle produced by [`Provider::configure`] and shared by
    /// every resource of this provider.
    type Meta: Clone + Send + Sync;

    /// Provider name, used as the resource type prefix.
    fn name(&self) -> &'static str;

    /// Provider configuration schema.
    fn schema(&self) -> SchemaMap;

    /// Schemas of every resource type, available before configuration.
    fn resource_schemas(&self) -> BTreeMap<&'static str, SchemaMap>;

    /// Schemas of every data source type, available before configuration.
    fn data_source_schemas(&self) -> BTreeMap<&'static str, SchemaMap> {
        BTreeMap::new()
    }

    /// Build the client handle from validated configuration.
    async fn configure(&self, config: &ResourceData) -> Result<Self::Meta>;

    /// Instantiate the resources bound to a configured client.
    fn resources(&self, meta: &Self::Meta) -> ResourceMap;

    /// Instantiate the data sources bound to a configured client.
    fn data_sources(&self, _meta: &Self::Meta) -> DataSourceMap {
        DataSourceMap::new()
    }

    /// Apply schema defaults, validate, then configure.
    async fn prepare_and_configure(&self, mut config: ResourceData) -> Result<Self::Meta> {
        schema::prepare(&self.schema(), &mut config)?;
        self.configure(&config).await
    }

    /// Look up one resource type by name.
    fn resource(&self, meta: &Self::Meta, name: &str) -> Result<Box<dyn Resource>> {
        self.resources(meta).remove(name).ok_or_else(|| {
            InvalidInputError::UnknownType {
                kind: "resource",
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Look up one data source type by name.
    fn data_source(&self, meta: &Self::Meta, name: &str) -> Result<Box<dyn DataSource>> {
        self.data_sources(meta).remove(name).ok_or_else(|| {
            InvalidInputError::UnknownType {
                kind: "data source",
                name: name.to_string(),
            }
            .into()
        })
    }
}
