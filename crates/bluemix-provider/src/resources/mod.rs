//! Managed SoftLayer resources.

pub mod ssh_key;
pub mod virtual_guest;

pub use ssh_key::SshKeyResource;
pub use virtual_guest::VirtualGuestResource;
