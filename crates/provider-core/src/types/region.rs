//! Bluemix region type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::types::EndpointUrl;

/// A Bluemix region such as `ng`, `eu-gb` or `au-syd`.
///
/// The region decides the service domain (`{region}.bluemix.net`) from which
/// the login and IAM endpoints are derived.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Create a region, validating that it is a lowercase DNS label.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let invalid = |reason: &str| InvalidInputError::Region {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("must not be empty").into());
        }
        if s.len() > 63 {
            return Err(invalid("must be at most 63 characters").into());
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        {
            return Err(invalid("may only contain lowercase letters, digits, '-' and '.'").into());
        }
        if s.starts_with(['-', '.']) || s.ends_with(['-', '.']) {
            return Err(invalid("must start and end with a letter or digit").into());
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{region}.bluemix.net`
    pub fn domain(&self) -> String {
        format!("{}.bluemix.net", self.0)
    }

    /// UAA login server for the password and identity-cookie grants.
    pub fn login_endpoint(&self) -> Result<EndpointUrl, Error> {
        EndpointUrl::new(format!("https://login.{}/UAALoginServerWAR", self.domain()))
    }

    /// IAM server for the IMS token exchange.
    pub fn iam_endpoint(&self) -> Result<EndpointUrl, Error> {
        EndpointUrl::new(format!("https://iam.{}", self.domain()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_endpoints() {
        let region = Region::new("eu-gb").unwrap();
        assert_eq!(region.domain(), "eu-gb.bluemix.net");
        assert_eq!(
            region.login_endpoint().unwrap().join("oauth/token"),
            "https://login.eu-gb.bluemix.net/UAALoginServerWAR/oauth/token"
        );
        assert_eq!(
            region.iam_endpoint().unwrap().join("oidc/token"),
            "https://iam.eu-gb.bluemix.net/oidc/token"
        );
    }

    #[test]
    fn staging_regions_allowed() {
        assert!(Region::new("stage1.ng").is_ok());
    }

    #[test]
    fn rejects_bad_regions() {
        assert!(Region::new("").is_err());
        assert!(Region::new("NG").is_err());
        assert!(Region::new("-ng").is_err());
        assert!(Region::new("ng/evil").is_err());
    }
}
