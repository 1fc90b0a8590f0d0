//! Token endpoint paths and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// UAA token path under the login endpoint.
pub const OAUTH_TOKEN: &str = "oauth/token";

/// IAM token path under the IAM endpoint.
pub const OIDC_TOKEN: &str = "oidc/token";

/// `Basic` credentials of the public `cf` UAA client.
pub const UAA_CLIENT_AUTH: &str = "Basic Y2Y6";

/// Grant type for exchanging an identity cookie.
pub const IDENTITY_COOKIE_GRANT: &str = "urn:ibm:params:oauth:grant-type:identity-cookie";

/// Response type requesting both the IAM and IMS tokens.
pub const IMS_RESPONSE_TYPE: &str = "cloud_iam, ims_portal";

// ============================================================================
// Request Types
// ============================================================================

/// Form body for the password grant.
#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub grant_type: &'static str,
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<&'static str>,
}

impl<'a> PasswordGrantRequest<'a> {
    pub fn token(username: &'a str, password: &'a str) -> Self {
        Self {
            grant_type: "password",
            username,
            password,
            response_type: None,
        }
    }

    pub fn identity_cookie(username: &'a str, password: &'a str) -> Self {
        Self {
            response_type: Some("identity_cookie"),
            ..Self::token(username, password)
        }
    }
}

/// Form body for the refresh grant.
#[derive(Debug, Serialize)]
pub struct RefreshGrantRequest<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

/// Form body for the IMS token exchange.
#[derive(Debug, Serialize)]
pub struct ImsTokenRequest<'a> {
    pub grant_type: &'static str,
    pub cookie: &'a str,
    pub ims_account: &'a str,
    pub response_type: &'static str,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response from the password and refresh grants.
#[derive(Debug, Deserialize)]
pub struct AuthenticationResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Response from the identity-cookie grant.
#[derive(Debug, Deserialize)]
pub struct IdentityCookieResponse {
    #[serde(default)]
    pub expiration: i64,
    #[serde(default)]
    pub identity_cookie: String,
}

/// Response from the IMS token exchange.
#[derive(Debug, Deserialize)]
pub struct ImsTokenResponse {
    #[serde(default)]
    pub ims_token: String,
    #[serde(default)]
    pub ims_user_id: i64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expiration: i64,
}

/// Error body returned by UAA and IAM.
#[derive(Debug, Deserialize)]
pub struct TokenErrorResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
}
