//! Validated value types.
//!
//! These types check their invariants at construction time so that the
//! session and resource code never sees a malformed endpoint or region.

mod endpoint_url;
mod region;

pub use endpoint_url::EndpointUrl;
pub use region::Region;
