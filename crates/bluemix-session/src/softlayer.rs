//! SoftLayer session handle.

use std::fmt;
use std::time::Duration;

use provider_core::{ApiKey, EndpointUrl, ImsToken};

/// Default SoftLayer REST endpoint.
pub const DEFAULT_SOFTLAYER_ENDPOINT: &str = "https://api.softlayer.com/rest/v3";

/// How requests to the SoftLayer API authenticate.
#[derive(Clone, Copy)]
pub enum SoftLayerAuth<'a> {
    /// IMS token obtained through the Bluemix identity cookie exchange.
    ImsToken { user_id: i64, token: &'a ImsToken },
    /// Classic username and API key.
    ApiKey { username: &'a str, api_key: &'a ApiKey },
    /// No credentials configured.
    Anonymous,
}

/// Connection settings and credentials for the SoftLayer API.
///
/// Username and API key come from configuration. When a SoftLayer account
/// number is configured, the Bluemix session fills in the IMS user id and
/// token, which then take precedence over the API key.
#[derive(Clone)]
pub struct SoftLayerSession {
    username: Option<String>,
    api_key: Option<ApiKey>,
    endpoint: EndpointUrl,
    timeout: Duration,
    user_id: Option<i64>,
    auth_token: Option<ImsToken>,
}

impl SoftLayerSession {
    pub fn new(
        username: Option<String>,
        api_key: Option<ApiKey>,
        endpoint: EndpointUrl,
        timeout: Duration,
    ) -> Self {
        Self {
            username: username.filter(|u| !u.is_empty()),
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint,
            timeout,
            user_id: None,
            auth_token: None,
        }
    }

    /// Attach the IMS user id and token from the identity-cookie exchange.
    pub fn with_ims_token(mut self, user_id: i64, token: ImsToken) -> Self {
        self.user_id = Some(user_id);
        self.auth_token = Some(token);
        self
    }

    pub fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// The credentials to present, IMS token first.
    pub fn auth(&self) -> SoftLayerAuth<'_> {
        if let (Some(user_id), Some(token)) = (self.user_id, self.auth_token.as_ref()) {
            return SoftLayerAuth::ImsToken { user_id, token };
        }
        if let (Some(username), Some(api_key)) = (self.username.as_deref(), self.api_key.as_ref())
        {
            return SoftLayerAuth::ApiKey { username, api_key };
        }
        SoftLayerAuth::Anonymous
    }
}

impl fmt::Debug for SoftLayerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftLayerSession")
            .field("username", &self.username)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_id", &self.user_id)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> EndpointUrl {
        EndpointUrl::new(DEFAULT_SOFTLAYER_ENDPOINT).unwrap()
    }

    #[test]
    fn ims_token_takes_precedence() {
        let session = SoftLayerSession::new(
            Some("sl-user".to_string()),
            Some(ApiKey::new("key")),
            endpoint(),
            Duration::from_secs(60),
        )
        .with_ims_token(42, ImsToken::new("ims"));

        assert!(matches!(
            session.auth(),
            SoftLayerAuth::ImsToken { user_id: 42, .. }
        ));
    }

    #[test]
    fn api_key_auth_without_ims() {
        let session = SoftLayerSession::new(
            Some("sl-user".to_string()),
            Some(ApiKey::new("key")),
            endpoint(),
            Duration::from_secs(60),
        );

        assert!(matches!(
            session.auth(),
            SoftLayerAuth::ApiKey { username: "sl-user", .. }
        ));
    }

    #[test]
    fn empty_values_mean_anonymous() {
        let session = SoftLayerSession::new(
            Some(String::new()),
            Some(ApiKey::new("")),
            endpoint(),
            Duration::from_secs(60),
        );
        assert!(matches!(session.auth(), SoftLayerAuth::Anonymous));
    }

    #[test]
    fn debug_hides_credentials() {
        let session = SoftLayerSession::new(
            Some("sl-user".to_string()),
            Some(ApiKey::new("super-secret-key")),
            endpoint(),
            Duration::from_secs(60),
        )
        .with_ims_token(1, ImsToken::new("ims-secret"));

        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("ims-secret"));
    }
}
