//! bluemix-provider - Bluemix infrastructure resources on the SoftLayer API.
//!
//! The provider authenticates through [`bluemix_session`] and exposes the
//! `bluemix_infrastructure_ssh_key` resource and data source and the
//! `bluemix_infrastructure_virtual_guest` resource.

pub mod config;
pub mod data_sources;
pub mod provider;
pub mod resources;
pub mod softlayer;

pub use config::{ClientSession, Config};
pub use provider::{BluemixProvider, SSH_KEY, VIRTUAL_GUEST};
pub use softlayer::SoftLayerClient;
