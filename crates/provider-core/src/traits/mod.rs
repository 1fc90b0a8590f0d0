//! Core traits for providers, resources, and data sources.

mod provider;
mod resource;

pub use provider::{DataSourceMap, Provider, ResourceMap};
pub use resource::{DataSource, Resource};
