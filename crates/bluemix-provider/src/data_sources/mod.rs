//! Read-only SoftLayer lookups.

pub mod ssh_key;

pub use ssh_key::SshKeyDataSource;
