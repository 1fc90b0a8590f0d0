//! Subcommand implementations.

pub mod login;
pub mod logout;
pub mod namespace;
pub mod refresh;
pub mod schema;
pub mod ssh_key;
pub mod virtual_guest;
pub mod whoami;

use anyhow::{Result, bail};

use provider_core::ResourceData;

/// Parse a `KEY=VALUE` argument.
pub(crate) fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Fail when a read found nothing under `id`.
pub(crate) fn ensure_found(data: &ResourceData, kind: &str, id: &str) -> Result<()> {
    if data.id().is_none() {
        bail!("{kind} '{id}' not found");
    }
    Ok(())
}
