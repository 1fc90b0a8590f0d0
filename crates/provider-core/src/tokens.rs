//! Opaque secret types handed out by the token endpoints.
//!
//! Every type here hides its value in Debug output. Treat them as opaque;
//! they are only read back when building authorization headers or request
//! bodies.

use std::fmt;

macro_rules! secret {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the raw value for use in requests.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the server handed back an empty value.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&"[REDACTED]").finish()
            }
        }
    };
}

secret!(
    /// Bearer token from the Bluemix password grant.
    AccessToken
);

secret!(
    /// Long-lived token used to obtain new access tokens.
    RefreshToken
);

secret!(
    /// Intermediate credential exchanged for an IMS token without
    /// re-sending the password.
    IdentityCookie
);

secret!(
    /// Bearer token scoped to a nested SoftLayer (IMS) account.
    ImsToken
);

secret!(
    /// SoftLayer API key.
    ApiKey
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_hides_value_in_debug() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("AccessToken"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn ims_token_hides_value_in_debug() {
        let token = ImsToken::new("ims-secret-value");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("ims-secret-value"));
    }

    #[test]
    fn empty_detection() {
        assert!(IdentityCookie::new("").is_empty());
        assert!(!IdentityCookie::new("cookie").is_empty());
    }
}
