//! HTTP client for the form-encoded token endpoints.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use provider_core::error::ProtocolError;
use provider_core::{Credentials, Error};

use crate::endpoints::{TokenErrorResponse, UAA_CLIENT_AUTH};

/// Who the token request authenticates as.
#[derive(Debug, Clone, Copy)]
pub enum ClientAuth<'a> {
    /// The public `cf` UAA client.
    Uaa,
    /// An IAM client id and secret.
    Iam(&'a Credentials),
}

/// HTTP client for OAuth-style token requests.
#[derive(Debug, Clone)]
pub struct TokenClient {
    client: reqwest::Client,
}

impl TokenClient {
    /// Create a new token client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bluemix-session/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// POST a form body and decode the JSON response.
    #[instrument(skip(self, form, auth))]
    pub async fn post_form<F, R>(&self, url: &str, form: &F, auth: ClientAuth<'_>) -> Result<R, Error>
    where
        F: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("Token request");

        let request = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(form);

        let request = match auth {
            ClientAuth::Uaa => request.header(AUTHORIZATION, UAA_CLIENT_AUTH),
            ClientAuth::Iam(client) => {
                request.basic_auth(client.username(), Some(client.password()))
            }
        };

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Decode a token response. Token endpoints answer 200; any other status
    /// is an error, even another 2xx.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "Token response");

        if status == StatusCode::OK {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<TokenErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error, body.error_description),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}
