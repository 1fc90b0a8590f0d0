//! bluemix-session - Authenticated sessions for Bluemix and SoftLayer.
//!
//! A [`Session`] runs the UAA password grant, requests an identity cookie
//! when a SoftLayer account is configured, and exchanges that cookie for an
//! IMS token. The IMS exchange is retried under a fixed [`RetryPolicy`].

mod client;
mod endpoints;
mod options;
mod retry;
mod session;
mod softlayer;

pub use options::{DEFAULT_TIMEOUT, SessionOptions, parse_timeout};
pub use retry::{Exhausted, RetryPolicy};
pub use session::{Session, TokenSet};
pub use softlayer::{DEFAULT_SOFTLAYER_ENDPOINT, SoftLayerAuth, SoftLayerSession};
