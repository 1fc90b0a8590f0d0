//! Environment variable fallback for provider settings.
//!
//! Each setting has a primary variable and a legacy alias. The primary name
//! wins when both are set; empty values count as unset.

use std::fmt;

use tracing::debug;

/// Default Bluemix region when none is configured.
pub const DEFAULT_REGION: &str = "ng";

/// A provider setting that can be read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvParam {
    Username,
    Password,
    IdentityCookie,
    Region,
    Timeout,
    IamClientId,
    IamSecret,
    SoftLayerUsername,
    SoftLayerApiKey,
    SoftLayerAccountNumber,
    KubeHost,
    KubeToken,
}

impl EnvParam {
    /// Every parameter, in declaration order.
    pub const ALL: [EnvParam; 12] = [
        EnvParam::Username,
        EnvParam::Password,
        EnvParam::IdentityCookie,
        EnvParam::Region,
        EnvParam::Timeout,
        EnvParam::IamClientId,
        EnvParam::IamSecret,
        EnvParam::SoftLayerUsername,
        EnvParam::SoftLayerApiKey,
        EnvParam::SoftLayerAccountNumber,
        EnvParam::KubeHost,
        EnvParam::KubeToken,
    ];

    /// The preferred variable name.
    pub fn primary(self) -> &'static str {
        match self {
            EnvParam::Username => "BM_USERNAME",
            EnvParam::Password => "BM_PASSWORD",
            EnvParam::IdentityCookie => "BM_IDENTITY_COOKIE",
            EnvParam::Region => "BM_REGION",
            EnvParam::Timeout => "BM_TIMEOUT",
            EnvParam::IamClientId => "BM_IAM_CLIENT_ID",
            EnvParam::IamSecret => "BM_IAM_SECRET",
            EnvParam::SoftLayerUsername => "SL_USERNAME",
            EnvParam::SoftLayerApiKey => "SL_API_KEY",
            EnvParam::SoftLayerAccountNumber => "SL_ACCOUNT_NUMBER",
            EnvParam::KubeHost => "KUBE_HOST",
            EnvParam::KubeToken => "KUBE_TOKEN",
        }
    }

    /// The legacy alias, consulted only when the primary is unset.
    pub fn legacy(self) -> &'static str {
        match self {
            EnvParam::Username => "BLUEMIX_USERNAME",
            EnvParam::Password => "BLUEMIX_PASSWORD",
            EnvParam::IdentityCookie => "BLUEMIX_IDENTITY_COOKIE",
            EnvParam::Region => "BLUEMIX_REGION",
            EnvParam::Timeout => "BLUEMIX_TIMEOUT",
            EnvParam::IamClientId => "BLUEMIX_IAM_CLIENT_ID",
            EnvParam::IamSecret => "BLUEMIX_IAM_SECRET",
            EnvParam::SoftLayerUsername => "SOFTLAYER_USERNAME",
            EnvParam::SoftLayerApiKey => "SOFTLAYER_API_KEY",
            EnvParam::SoftLayerAccountNumber => "SOFTLAYER_ACCOUNT_NUMBER",
            EnvParam::KubeHost => "KUBERNETES_HOST",
            EnvParam::KubeToken => "KUBERNETES_TOKEN",
        }
    }

    /// Value used when neither variable is set.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            EnvParam::Region => Some(DEFAULT_REGION),
            _ => None,
        }
    }

    /// Returns the value for this parameter from the environment.
    pub fn from_env(self) -> Option<String> {
        if let Some(value) = read_var(self.primary()) {
            return Some(value);
        }
        if let Some(value) = read_var(self.legacy()) {
            debug!(param = %self, legacy = self.legacy(), "Using legacy environment variable");
            return Some(value);
        }
        self.default_value().map(str::to_string)
    }

    /// Returns `value` if it is set and non-empty, otherwise the environment
    /// value for this parameter.
    pub fn or_env(self, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.is_empty() => Some(v),
            _ => self.from_env(),
        }
    }
}

impl fmt::Display for EnvParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary())
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_wins_over_legacy() {
        temp_env::with_vars(
            [
                ("BM_USERNAME", Some("primary-user")),
                ("BLUEMIX_USERNAME", Some("legacy-user")),
            ],
            || {
                assert_eq!(
                    EnvParam::Username.from_env().as_deref(),
                    Some("primary-user")
                );
            },
        );
    }

    #[test]
    fn legacy_used_when_primary_unset() {
        temp_env::with_vars(
            [
                ("SL_API_KEY", None),
                ("SOFTLAYER_API_KEY", Some("legacy-key")),
            ],
            || {
                assert_eq!(
                    EnvParam::SoftLayerApiKey.from_env().as_deref(),
                    Some("legacy-key")
                );
            },
        );
    }

    #[test]
    fn empty_primary_falls_through_to_legacy() {
        temp_env::with_vars(
            [
                ("BM_PASSWORD", Some("")),
                ("BLUEMIX_PASSWORD", Some("legacy-pw")),
            ],
            || {
                assert_eq!(
                    EnvParam::Password.from_env().as_deref(),
                    Some("legacy-pw")
                );
            },
        );
    }

    #[test]
    fn region_defaults_to_ng() {
        temp_env::with_vars_unset(["BM_REGION", "BLUEMIX_REGION"], || {
            assert_eq!(EnvParam::Region.from_env().as_deref(), Some("ng"));
        });
    }

    #[test]
    fn explicit_value_wins_over_env() {
        temp_env::with_var("BM_TIMEOUT", Some("30"), || {
            assert_eq!(
                EnvParam::Timeout.or_env(Some("90".to_string())).as_deref(),
                Some("90")
            );
            assert_eq!(EnvParam::Timeout.or_env(None).as_deref(), Some("30"));
            assert_eq!(
                EnvParam::Timeout.or_env(Some(String::new())).as_deref(),
                Some("30")
            );
        });
    }

    #[test]
    fn unset_without_default_is_none() {
        temp_env::with_vars_unset(["BM_IAM_SECRET", "BLUEMIX_IAM_SECRET"], || {
            assert!(EnvParam::IamSecret.from_env().is_none());
        });
    }

    #[test]
    fn names_are_distinct() {
        for param in EnvParam::ALL {
            assert_ne!(param.primary(), param.legacy());
        }
    }
}
