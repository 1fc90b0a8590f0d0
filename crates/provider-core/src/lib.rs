//! provider-core - Core types and traits shared by the providers.
//!
//! This crate holds everything the Bluemix and Kubernetes providers have in
//! common: the error type, secret token wrappers, environment fallback for
//! credentials, validated endpoint types, and the schema / resource-data
//! model that provider and resource implementations are written against.

pub mod credentials;
pub mod data;
pub mod env;
pub mod error;
pub mod schema;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use data::ResourceData;
pub use env::EnvParam;
pub use error::Error;
pub use schema::{Schema, SchemaMap, ValueType};
pub use tokens::{AccessToken, ApiKey, IdentityCookie, ImsToken, RefreshToken};
pub use traits::{DataSource, DataSourceMap, Provider, Resource, ResourceMap};
pub use types::{EndpointUrl, Region};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
