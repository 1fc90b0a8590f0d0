//! SoftLayer REST client.

use reqwest::header::ACCEPT;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, instrument, trace};

use bluemix_session::{SoftLayerAuth, SoftLayerSession};
use provider_core::error::ProtocolError;
use provider_core::{EndpointUrl, Error};

use super::types::SoftLayerErrorResponse;

/// HTTP client for SoftLayer REST v3 service methods.
///
/// Calls are addressed as `{endpoint}/{service}[/{id}]/{method}`. Method
/// parameters travel in a `{"parameters": [...]}` body.
#[derive(Debug, Clone)]
pub struct SoftLayerClient {
    client: reqwest::Client,
    session: SoftLayerSession,
}

impl SoftLayerClient {
    /// Create a new client for the given SoftLayer session.
    pub fn new(session: SoftLayerSession) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bluemix-provider/", env!("CARGO_PKG_VERSION")))
            .timeout(session.timeout())
            .build()
            .expect("failed to build HTTP client");

        Self { client, session }
    }

    pub fn endpoint(&self) -> &EndpointUrl {
        self.session.endpoint()
    }

    /// Call a read-only service method (GET request).
    ///
    /// `mask` is sent as the `objectMask` query parameter.
    #[instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn get<R>(
        &self,
        service: &str,
        id: Option<i64>,
        method: &str,
        mask: Option<&str>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.method_url(service, id, method);
        debug!(%url, "SoftLayer query");

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(mask) = mask {
            request = request.query(&[("objectMask", format!("mask[{mask}]"))]);
        }

        let response = self.authorize(request).send().await?;
        self.handle_response(response).await
    }

    /// Call a service method with parameters (POST request).
    #[instrument(skip(self, parameters), fields(endpoint = %self.endpoint()))]
    pub async fn call<P, R>(
        &self,
        service: &str,
        id: Option<i64>,
        method: &str,
        parameters: &[P],
    ) -> Result<R, Error>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let url = self.method_url(service, id, method);
        debug!(%url, "SoftLayer call");

        let response = self
            .authorize(self.client.post(&url))
            .header(ACCEPT, "application/json")
            .json(&json!({ "parameters": parameters }))
            .send()
            .await?;

        self.handle_response(response).await
    }

    fn method_url(&self, service: &str, id: Option<i64>, method: &str) -> String {
        match id {
            Some(id) => self.endpoint().join(&format!("{service}/{id}/{method}")),
            None => self.endpoint().join(&format!("{service}/{method}")),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.auth() {
            SoftLayerAuth::ImsToken { user_id, token } => {
                request.basic_auth(user_id, Some(token.as_str()))
            }
            SoftLayerAuth::ApiKey { username, api_key } => {
                request.basic_auth(username, Some(api_key.as_str()))
            }
            SoftLayerAuth::Anonymous => request,
        }
    }

    /// Handle a SoftLayer response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "SoftLayer response");

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<SoftLayerErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.code, body.error),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}
