//! Persisted login state.

pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bluemix_provider::ClientSession;
use bluemix_session::SessionOptions;

/// The non-secret session options worth remembering between runs.
///
/// Passwords and API keys are never written to disk; they come back from
/// the environment when a stored session is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub softlayer_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub softlayer_endpoint_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub softlayer_account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_endpoint: Option<String>,
}

impl StoredOptions {
    /// Keep the parts of `options` that are safe to persist.
    pub fn from_options(options: &SessionOptions) -> Self {
        Self {
            username: options.username.clone(),
            region: options.region.clone(),
            timeout: options.timeout.clone(),
            softlayer_username: options.softlayer_username.clone(),
            softlayer_endpoint_url: options.softlayer_endpoint_url.clone(),
            softlayer_account_number: options.softlayer_account_number.clone(),
            login_endpoint: options.login_endpoint.clone(),
            iam_endpoint: options.iam_endpoint.clone(),
        }
    }

    /// Session options for restoring a session, secrets taken from the
    /// environment.
    pub fn to_options(&self) -> SessionOptions {
        SessionOptions {
            username: self.username.clone(),
            region: self.region.clone(),
            timeout: self.timeout.clone(),
            softlayer_username: self.softlayer_username.clone(),
            softlayer_endpoint_url: self.softlayer_endpoint_url.clone(),
            softlayer_account_number: self.softlayer_account_number.clone(),
            login_endpoint: self.login_endpoint.clone(),
            iam_endpoint: self.iam_endpoint.clone(),
            ..Default::default()
        }
        .with_env_fallback()
    }
}

/// A session restored from disk.
#[derive(Debug)]
pub struct CliSession {
    pub client: ClientSession,
    pub options: StoredOptions,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_not_kept() {
        let options = SessionOptions {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            softlayer_api_key: Some("sl-key".to_string()),
            softlayer_account_number: Some("278444".to_string()),
            ..Default::default()
        };

        let stored = StoredOptions::from_options(&options);
        let json = serde_json::to_string(&stored).unwrap();

        assert!(json.contains("alice"));
        assert!(json.contains("278444"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("sl-key"));
    }
}
