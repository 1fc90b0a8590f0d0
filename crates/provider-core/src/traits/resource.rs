//! Resource and data source traits.

use async_trait::async_trait;

use crate::data::ResourceData;
use crate::schema::SchemaMap;
use crate::Result;

/// A managed remote object with create/read/update/delete callbacks.
///
/// Every callback works on the same [`ResourceData`]: create sets the id,
/// read refreshes attributes (or clears the id when the object is gone),
/// update pushes changed attributes, delete clears the id.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute schema for this resource type.
    fn schema(&self) -> SchemaMap;

    /// Create the remote object and record its id.
    async fn create(&self, data: &mut ResourceData) -> Result<()>;

    /// Refresh attributes from the remote object.
    async fn read(&self, data: &mut ResourceData) -> Result<()>;

    /// Push attribute changes to the remote object.
    async fn update(&self, data: &mut ResourceData) -> Result<()>;

    /// Delete the remote object.
    async fn delete(&self, data: &mut ResourceData) -> Result<()>;

    /// Adopt an existing object by id.
    async fn import(&self, id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::with_id(id);
        self.read(&mut data).await?;
        Ok(data)
    }
}

/// A read-only lookup of remote objects.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Attribute schema for this data source.
    fn schema(&self) -> SchemaMap;

    /// Resolve the lookup arguments in `data` and fill in the results.
    async fn read(&self, data: &mut ResourceData) -> Result<()>;
}
