//! Session storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use bluemix_provider::ClientSession;
use bluemix_session::{Session, TokenSet};

use super::{CliSession, StoredOptions};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    options: StoredOptions,
    tokens: TokenSet,
    saved_at: DateTime<Utc>,
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "bmx").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save a session's tokens, with the options needed to restore it.
pub async fn save_session(session: &Session, options: &StoredOptions) -> Result<()> {
    let stored = StoredSession {
        options: options.clone(),
        tokens: session.tokens().await,
        saved_at: Utc::now(),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    // Tokens are bearer credentials.
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    tracing::debug!(path = %path.display(), "Saved session");
    Ok(())
}

/// Load a session from disk without contacting any endpoint.
pub async fn load_session() -> Result<Option<CliSession>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    let session = Session::from_persisted(&stored.options.to_options(), stored.tokens)
        .context("Invalid session settings")?;

    Ok(Some(CliSession {
        client: ClientSession::new(session).await,
        options: stored.options,
        saved_at: stored.saved_at,
    }))
}

/// Load the stored session or explain how to create one.
pub async fn require_session() -> Result<CliSession> {
    load_session()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'bmx login' first.")
}

/// Clear the stored session.
pub async fn clear_session() -> Result<()> {
    let path = session_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
    }

    Ok(())
}
