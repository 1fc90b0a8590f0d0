//! Session construction options.

use std::fmt;
use std::time::Duration;

use provider_core::EnvParam;
use provider_core::error::InvalidInputError;

use crate::retry::RetryPolicy;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Raw inputs for [`Session::new`](crate::Session::new).
///
/// Every field is optional; unset fields are filled from the environment by
/// [`SessionOptions::with_env_fallback`] and from defaults at construction.
#[derive(Clone, Default)]
pub struct SessionOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub identity_cookie: Option<String>,
    /// Bluemix region, e.g. `ng`, `eu-gb`, `au-syd`.
    pub region: Option<String>,
    pub iam_client_id: Option<String>,
    pub iam_secret: Option<String>,
    /// Request timeout in seconds.
    pub timeout: Option<String>,
    pub softlayer_username: Option<String>,
    pub softlayer_api_key: Option<String>,
    pub softlayer_endpoint_url: Option<String>,
    pub softlayer_account_number: Option<String>,
    /// SoftLayer request timeout in seconds.
    pub softlayer_timeout: Option<String>,
    /// Overrides the login endpoint derived from the region.
    pub login_endpoint: Option<String>,
    /// Overrides the IAM endpoint derived from the region.
    pub iam_endpoint: Option<String>,
    pub retry: RetryPolicy,
}

impl SessionOptions {
    /// Fill unset fields from their environment variables.
    pub fn with_env_fallback(self) -> Self {
        Self {
            username: EnvParam::Username.or_env(self.username),
            password: EnvParam::Password.or_env(self.password),
            identity_cookie: EnvParam::IdentityCookie.or_env(self.identity_cookie),
            region: EnvParam::Region.or_env(self.region),
            iam_client_id: EnvParam::IamClientId.or_env(self.iam_client_id),
            iam_secret: EnvParam::IamSecret.or_env(self.iam_secret),
            timeout: EnvParam::Timeout.or_env(self.timeout),
            softlayer_username: EnvParam::SoftLayerUsername.or_env(self.softlayer_username),
            softlayer_api_key: EnvParam::SoftLayerApiKey.or_env(self.softlayer_api_key),
            softlayer_account_number: EnvParam::SoftLayerAccountNumber
                .or_env(self.softlayer_account_number),
            ..self
        }
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("SessionOptions")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("identity_cookie", &redact(&self.identity_cookie))
            .field("region", &self.region)
            .field("iam_client_id", &self.iam_client_id)
            .field("iam_secret", &redact(&self.iam_secret))
            .field("timeout", &self.timeout)
            .field("softlayer_username", &self.softlayer_username)
            .field("softlayer_api_key", &redact(&self.softlayer_api_key))
            .field("softlayer_endpoint_url", &self.softlayer_endpoint_url)
            .field("softlayer_account_number", &self.softlayer_account_number)
            .field("softlayer_timeout", &self.softlayer_timeout)
            .field("login_endpoint", &self.login_endpoint)
            .field("iam_endpoint", &self.iam_endpoint)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Parse a timeout given in (possibly fractional) seconds.
///
/// Unset or empty values give [`DEFAULT_TIMEOUT`].
pub fn parse_timeout(value: Option<&str>) -> Result<Duration, InvalidInputError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_TIMEOUT);
    };

    raw.parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| InvalidInputError::Timeout {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_to_sixty_seconds() {
        assert_eq!(parse_timeout(None).unwrap(), Duration::from_secs(60));
        assert_eq!(parse_timeout(Some("  ")).unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn timeout_parses_seconds() {
        assert_eq!(parse_timeout(Some("90")).unwrap(), Duration::from_secs(90));
        assert_eq!(
            parse_timeout(Some("1.5")).unwrap(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn timeout_rejects_garbage() {
        assert!(parse_timeout(Some("soon")).is_err());
        assert!(parse_timeout(Some("-5")).is_err());
        assert!(parse_timeout(Some("0")).is_err());
    }

    #[test]
    fn timeout_rejects_values_beyond_duration_range() {
        assert!(parse_timeout(Some("1e20")).is_err());
        assert!(parse_timeout(Some("inf")).is_err());
        assert!(parse_timeout(Some("NaN")).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let options = SessionOptions {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            iam_secret: Some("iam-secret".to_string()),
            softlayer_api_key: Some("sl-key".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", options);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("iam-secret"));
        assert!(!debug.contains("sl-key"));
    }

    #[test]
    fn env_fallback_keeps_explicit_values() {
        temp_env::with_vars(
            [
                ("BM_USERNAME", Some("env-user")),
                ("BM_PASSWORD", Some("env-pass")),
                ("BM_REGION", None),
                ("BLUEMIX_REGION", Some("eu-gb")),
                ("SL_ACCOUNT_NUMBER", None),
                ("SOFTLAYER_ACCOUNT_NUMBER", Some("1234")),
            ],
            || {
                let options = SessionOptions {
                    username: Some("explicit".to_string()),
                    ..Default::default()
                }
                .with_env_fallback();

                assert_eq!(options.username.as_deref(), Some("explicit"));
                assert_eq!(options.password.as_deref(), Some("env-pass"));
                assert_eq!(options.region.as_deref(), Some("eu-gb"));
                assert_eq!(options.softlayer_account_number.as_deref(), Some("1234"));
            },
        );
    }
}
