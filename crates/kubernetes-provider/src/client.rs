//! Kubernetes core v1 REST client.

use reqwest::Method;
use reqwest::header::ACCEPT;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use provider_core::error::ProtocolError;
use provider_core::{AccessToken, EndpointUrl, Error};

use crate::types::{Namespace, Status};

const NAMESPACES: &str = "api/v1/namespaces";

/// HTTP client for the namespaces API of one cluster.
#[derive(Debug, Clone)]
pub struct KubeClient {
    client: reqwest::Client,
    host: EndpointUrl,
    token: Option<AccessToken>,
}

impl KubeClient {
    /// Create a new client for the given API server.
    pub fn new(host: EndpointUrl, token: Option<AccessToken>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kubernetes-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            host,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn host(&self) -> &EndpointUrl {
        &self.host
    }

    #[instrument(skip(self), fields(host = %self.host))]
    pub async fn get_namespace(&self, name: &str) -> Result<Namespace, Error> {
        self.send(Method::GET, &format!("{NAMESPACES}/{name}"), None::<&()>)
            .await
    }

    #[instrument(skip(self, namespace), fields(host = %self.host))]
    pub async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace, Error> {
        self.send(Method::POST, NAMESPACES, Some(namespace)).await
    }

    #[instrument(skip(self, namespace), fields(host = %self.host))]
    pub async fn update_namespace(&self, namespace: &Namespace) -> Result<Namespace, Error> {
        let name = namespace.metadata.name.as_deref().unwrap_or_default();
        self.send(Method::PUT, &format!("{NAMESPACES}/{name}"), Some(namespace))
            .await
    }

    /// Request deletion. The namespace lingers in `Terminating` until its
    /// contents are gone.
    #[instrument(skip(self), fields(host = %self.host))]
    pub async fn delete_namespace(&self, name: &str) -> Result<(), Error> {
        self.send::<_, serde_json::Value>(
            Method::DELETE,
            &format!("{NAMESPACES}/{name}"),
            None::<&()>,
        )
        .await
        .map(drop)
    }

    async fn send<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.host.join(path);
        debug!(%method, %url, "Kubernetes request");

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "Kubernetes response");

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<Status>().await {
            Ok(body) => ProtocolError::new(status, body.reason, body.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}
