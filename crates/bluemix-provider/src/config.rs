//! Provider configuration and the client session it produces.

use std::fmt;

use tracing::{debug, instrument};

use bluemix_session::{RetryPolicy, Session, SessionOptions, SoftLayerSession};
use provider_core::{ResourceData, Result};

use crate::softlayer::SoftLayerClient;

/// Values copied from the provider configuration block.
///
/// Timeouts are kept as seconds strings, the form the session parses.
#[derive(Clone, Default)]
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    pub region: Option<String>,
    pub timeout: Option<String>,
    pub softlayer_username: Option<String>,
    pub softlayer_api_key: Option<String>,
    pub softlayer_endpoint_url: Option<String>,
    pub softlayer_timeout: Option<String>,
    pub softlayer_account_number: Option<String>,
    /// Retry budget for the IMS token exchange.
    pub retry: RetryPolicy,
}

impl Config {
    /// Read the configuration from validated provider data.
    pub fn from_resource_data(data: &ResourceData) -> Self {
        let string = |key: &str| data.get_non_empty(key).map(str::to_string);
        let seconds = |key: &str| data.get_i64(key).map(|secs| secs.to_string());

        Self {
            username: string("username"),
            password: string("password"),
            region: string("region"),
            timeout: seconds("timeout"),
            softlayer_username: string("softlayer_username"),
            softlayer_api_key: string("softlayer_api_key"),
            softlayer_endpoint_url: string("softlayer_endpoint_url"),
            softlayer_timeout: seconds("softlayer_timeout"),
            softlayer_account_number: string("softlayer_account_number"),
            retry: RetryPolicy::default(),
        }
    }

    /// Session options carrying exactly the configured values.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            username: self.username.clone(),
            password: self.password.clone(),
            region: self.region.clone(),
            timeout: self.timeout.clone(),
            softlayer_username: self.softlayer_username.clone(),
            softlayer_api_key: self.softlayer_api_key.clone(),
            softlayer_endpoint_url: self.softlayer_endpoint_url.clone(),
            softlayer_timeout: self.softlayer_timeout.clone(),
            softlayer_account_number: self.softlayer_account_number.clone(),
            retry: self.retry,
            ..Default::default()
        }
    }

    /// Authenticate and build the session shared by every resource.
    ///
    /// Unset values fall back to the environment first.
    #[instrument(skip(self))]
    pub async fn client_session(&self) -> Result<ClientSession> {
        let options = self.session_options().with_env_fallback();
        debug!(?options, "Building client session");

        let session = Session::new(options).await?;
        Ok(ClientSession::new(session).await)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.session_options(), f)
    }
}

/// The configured provider handle: a Bluemix session plus the SoftLayer
/// session derived from it.
#[derive(Debug, Clone)]
pub struct ClientSession {
    bluemix: Session,
    softlayer: SoftLayerSession,
}

impl ClientSession {
    /// Wrap an authenticated session, capturing its SoftLayer credentials.
    pub async fn new(session: Session) -> Self {
        let softlayer = session.softlayer_session().await;
        Self {
            bluemix: session,
            softlayer,
        }
    }

    pub fn bluemix_session(&self) -> &Session {
        &self.bluemix
    }

    pub fn softlayer_session(&self) -> &SoftLayerSession {
        &self.softlayer
    }

    /// A SoftLayer REST client authenticated as this session.
    pub fn softlayer_client(&self) -> SoftLayerClient {
        SoftLayerClient::new(self.softlayer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_resource_data_renders_timeouts_as_seconds() {
        let data = ResourceData::new()
            .with("username", "alice")
            .with("password", "secret")
            .with("region", "eu-gb")
            .with("timeout", 90)
            .with("softlayer_timeout", 30)
            .with("softlayer_username", "")
            .with("softlayer_account_number", "278444");

        let config = Config::from_resource_data(&data);
        assert_eq!(config.timeout.as_deref(), Some("90"));
        assert_eq!(config.softlayer_timeout.as_deref(), Some("30"));
        assert_eq!(config.region.as_deref(), Some("eu-gb"));
        assert!(config.softlayer_username.is_none());

        let options = config.session_options();
        assert_eq!(options.username.as_deref(), Some("alice"));
        assert_eq!(options.softlayer_account_number.as_deref(), Some("278444"));
        assert!(options.identity_cookie.is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let config = Config {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn client_session_wraps_persisted_tokens() {
        let tokens = bluemix_session::TokenSet {
            ims_token: Some(provider_core::ImsToken::new("ims")),
            ims_user_id: Some(12),
            ..Default::default()
        };
        let session = Session::from_persisted(&SessionOptions::default(), tokens).unwrap();
        let client = ClientSession::new(session).await;

        assert_eq!(client.softlayer_session().user_id(), Some(12));
        assert_eq!(client.bluemix_session().region().as_str(), "ng");
    }
}
