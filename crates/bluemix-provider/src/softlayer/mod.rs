//! SoftLayer REST API access.

mod client;
pub mod types;

pub use client::SoftLayerClient;

use provider_core::ResourceData;
use provider_core::error::InvalidInputError;

/// Parse the numeric SoftLayer object id stored as the resource id.
pub(crate) fn object_id(data: &ResourceData) -> Result<i64, InvalidInputError> {
    let id = data.require_id()?;
    id.parse()
        .map_err(|_| InvalidInputError::attribute("id", format!("{id:?} is not a SoftLayer id")))
}
