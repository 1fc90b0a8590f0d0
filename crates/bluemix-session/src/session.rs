//! Authenticated Bluemix session.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use provider_core::env::DEFAULT_REGION;
use provider_core::error::AuthError;
use provider_core::{
    AccessToken, ApiKey, Credentials, EndpointUrl, Error, IdentityCookie, ImsToken, RefreshToken,
    Region, Result,
};

use crate::client::{ClientAuth, TokenClient};
use crate::endpoints::{
    AuthenticationResponse, IDENTITY_COOKIE_GRANT, IMS_RESPONSE_TYPE, IdentityCookieResponse,
    ImsTokenRequest, ImsTokenResponse, OAUTH_TOKEN, OIDC_TOKEN, PasswordGrantRequest,
    RefreshGrantRequest,
};
use crate::options::{SessionOptions, parse_timeout};
use crate::retry::RetryPolicy;
use crate::softlayer::{DEFAULT_SOFTLAYER_ENDPOINT, SoftLayerSession};

/// A session authenticated against Bluemix and, optionally, a nested
/// SoftLayer (IMS) account.
///
/// Construction runs up to three exchanges: the password grant for an
/// access token, the identity-cookie grant, and the IMS token exchange. The
/// last one is retried under the session's [`RetryPolicy`].
///
/// Sessions are cheap to clone and share their token state.
///
/// # Example
///
/// ```no_run
/// use bluemix_session::{Session, SessionOptions};
///
/// # async fn example() -> Result<(), provider_core::Error> {
/// let options = SessionOptions {
///     username: Some("alice@example.com".to_string()),
///     password: Some("passw0rd".to_string()),
///     region: Some("ng".to_string()),
///     ..Default::default()
/// };
/// let session = Session::new(options.with_env_fallback()).await?;
/// println!("Authenticated in {}", session.region());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    credentials: Option<Credentials>,
    /// Known even when the password is not, e.g. for restored sessions.
    username: Option<String>,
    iam_client: Option<Credentials>,
    region: Region,
    login_endpoint: EndpointUrl,
    iam_endpoint: EndpointUrl,
    timeout: Duration,
    softlayer_account_number: Option<String>,
    client: TokenClient,
    retry: RetryPolicy,
    softlayer: SoftLayerSession,
    tokens: RwLock<TokenSet>,
}

/// Every token a session holds; the persisted form of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenSet {
    #[serde(default, with = "secret_opt")]
    pub access_token: Option<AccessToken>,
    #[serde(default, with = "secret_opt")]
    pub refresh_token: Option<RefreshToken>,
    #[serde(default, with = "secret_opt")]
    pub identity_cookie: Option<IdentityCookie>,
    #[serde(default, with = "secret_opt")]
    pub ims_token: Option<ImsToken>,
    #[serde(default)]
    pub ims_user_id: Option<i64>,
}

impl Session {
    /// Authenticate and build a new session.
    ///
    /// Options are used as given; call
    /// [`SessionOptions::with_env_fallback`] first to honor the environment.
    ///
    /// # Errors
    ///
    /// Fails fast with [`AuthError::MissingCredentials`] when neither a
    /// username and password nor an identity cookie is present. Errors from
    /// the password and identity-cookie grants propagate as-is; the IMS
    /// exchange fails with [`AuthError::ImsTokenAcquisition`] once its retry
    /// budget is spent.
    #[instrument(skip(options), fields(region = options.region.as_deref().unwrap_or(DEFAULT_REGION)))]
    pub async fn new(options: SessionOptions) -> Result<Self> {
        let credentials =
            Credentials::from_parts(options.username.as_deref(), options.password.as_deref());
        let identity_cookie = options
            .identity_cookie
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(IdentityCookie::new);

        if credentials.is_none() && identity_cookie.is_none() {
            return Err(AuthError::MissingCredentials.into());
        }

        let session = Self::build(
            &options,
            credentials,
            TokenSet {
                identity_cookie,
                ..Default::default()
            },
        )?;

        if session.inner.credentials.is_some() {
            session.authenticate().await?;
        }

        if let Some(account) = session.inner.softlayer_account_number.clone() {
            if session.identity_cookie().await.is_none() {
                session.create_identity_cookie().await?;
            }
            session.create_ims_token(&account).await?;
        }

        info!("Session established");
        Ok(session)
    }

    /// Restore a session from persisted tokens without contacting any
    /// endpoint. The caller is responsible for the tokens being valid.
    pub fn from_persisted(options: &SessionOptions, tokens: TokenSet) -> Result<Self> {
        let credentials =
            Credentials::from_parts(options.username.as_deref(), options.password.as_deref());
        Self::build(options, credentials, tokens)
    }

    fn build(
        options: &SessionOptions,
        credentials: Option<Credentials>,
        tokens: TokenSet,
    ) -> Result<Self> {
        let region = Region::new(
            options
                .region
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_REGION),
        )?;

        let login_endpoint = match options.login_endpoint.as_deref() {
            Some(url) => EndpointUrl::new(url)?,
            None => region.login_endpoint()?,
        };
        let iam_endpoint = match options.iam_endpoint.as_deref() {
            Some(url) => EndpointUrl::new(url)?,
            None => region.iam_endpoint()?,
        };

        let timeout = parse_timeout(options.timeout.as_deref())?;
        let softlayer_timeout = parse_timeout(options.softlayer_timeout.as_deref())?;

        let softlayer_endpoint = EndpointUrl::new(
            options
                .softlayer_endpoint_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_SOFTLAYER_ENDPOINT),
        )?;
        let mut softlayer = SoftLayerSession::new(
            options.softlayer_username.clone(),
            options.softlayer_api_key.clone().map(ApiKey::new),
            softlayer_endpoint,
            softlayer_timeout,
        );
        if let (Some(user_id), Some(token)) = (tokens.ims_user_id, tokens.ims_token.clone()) {
            softlayer = softlayer.with_ims_token(user_id, token);
        }

        let iam_client = Credentials::from_parts(
            options.iam_client_id.as_deref(),
            options.iam_secret.as_deref(),
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                username: options.username.clone().filter(|u| !u.is_empty()),
                credentials,
                iam_client,
                region,
                login_endpoint,
                iam_endpoint,
                timeout,
                softlayer_account_number: options
                    .softlayer_account_number
                    .clone()
                    .filter(|a| !a.is_empty()),
                client: TokenClient::new(timeout),
                retry: options.retry,
                softlayer,
                tokens: RwLock::new(tokens),
            }),
        })
    }

    /// Run the password grant and store the access and refresh tokens.
    #[instrument(skip(self), fields(endpoint = %self.inner.login_endpoint))]
    pub async fn authenticate(&self) -> Result<()> {
        let credentials = self.credentials()?;
        debug!(username = credentials.username(), "Authenticating");

        let request = PasswordGrantRequest::token(credentials.username(), credentials.password());
        let response: AuthenticationResponse = self
            .inner
            .client
            .post_form(&self.inner.login_endpoint.join(OAUTH_TOKEN), &request, ClientAuth::Uaa)
            .await?;

        self.store_grant(response).await;
        debug!("Authenticated");
        Ok(())
    }

    /// Exchange the refresh token for new access and refresh tokens.
    #[instrument(skip(self), fields(endpoint = %self.inner.login_endpoint))]
    pub async fn refresh(&self) -> Result<()> {
        info!("Refreshing session");

        let refresh_token = self
            .refresh_token()
            .await
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let request = RefreshGrantRequest {
            grant_type: "refresh_token",
            refresh_token: refresh_token.as_str(),
        };
        let response: AuthenticationResponse = self
            .inner
            .client
            .post_form(&self.inner.login_endpoint.join(OAUTH_TOKEN), &request, ClientAuth::Uaa)
            .await?;

        self.store_grant(response).await;
        debug!("Session refreshed successfully");
        Ok(())
    }

    /// Request an identity cookie with the password grant.
    #[instrument(skip(self), fields(endpoint = %self.inner.login_endpoint))]
    pub async fn create_identity_cookie(&self) -> Result<IdentityCookie> {
        let credentials = self.credentials()?;
        debug!("Creating the identity cookie");

        let request =
            PasswordGrantRequest::identity_cookie(credentials.username(), credentials.password());
        let response: IdentityCookieResponse = self
            .inner
            .client
            .post_form(&self.inner.login_endpoint.join(OAUTH_TOKEN), &request, ClientAuth::Uaa)
            .await?;

        let cookie = IdentityCookie::new(response.identity_cookie);
        if cookie.is_empty() {
            return Err(AuthError::EmptyToken {
                field: "identity_cookie",
            }
            .into());
        }

        self.inner.tokens.write().await.identity_cookie = Some(cookie.clone());
        Ok(cookie)
    }

    /// Exchange the identity cookie for an IMS token scoped to `account`.
    ///
    /// Network errors, non-200 answers, unparsable bodies, and empty tokens
    /// each consume one attempt of the retry budget.
    #[instrument(skip(self), fields(endpoint = %self.inner.iam_endpoint))]
    pub async fn create_ims_token(&self, account: &str) -> Result<ImsToken> {
        info!("Creating the IMS token");

        let cookie = self
            .identity_cookie()
            .await
            .ok_or(AuthError::EmptyToken {
                field: "identity_cookie",
            })?;
        let url = self.inner.iam_endpoint.join(OIDC_TOKEN);
        let request = ImsTokenRequest {
            grant_type: IDENTITY_COOKIE_GRANT,
            cookie: cookie.as_str(),
            ims_account: account,
            response_type: IMS_RESPONSE_TYPE,
        };
        let auth = match self.inner.iam_client.as_ref() {
            Some(client) => ClientAuth::Iam(client),
            None => ClientAuth::Uaa,
        };

        let response = self
            .inner
            .retry
            .run("IMS token acquisition", |attempt| {
                let url = &url;
                let request = &request;
                async move {
                    debug!(attempt, "Requesting IMS token");
                    let response: ImsTokenResponse =
                        self.inner.client.post_form(url, request, auth).await?;
                    if response.ims_token.is_empty() {
                        return Err(AuthError::EmptyToken { field: "ims_token" }.into());
                    }
                    Ok(response)
                }
            })
            .await
            .map_err(|exhausted| AuthError::ImsTokenAcquisition {
                attempts: exhausted.attempts,
                last_error: Box::new(exhausted.last_error),
            })?;

        let token = ImsToken::new(response.ims_token);
        {
            let mut tokens = self.inner.tokens.write().await;
            tokens.ims_token = Some(token.clone());
            tokens.ims_user_id = Some(response.ims_user_id);
        }

        info!(ims_user_id = response.ims_user_id, "IMS token acquired");
        Ok(token)
    }

    async fn store_grant(&self, response: AuthenticationResponse) {
        let mut tokens = self.inner.tokens.write().await;
        tokens.access_token = Some(AccessToken::new(response.access_token));
        if !response.refresh_token.is_empty() {
            tokens.refresh_token = Some(RefreshToken::new(response.refresh_token));
        }
    }

    fn credentials(&self) -> std::result::Result<&Credentials, Error> {
        self.inner
            .credentials
            .as_ref()
            .ok_or_else(|| AuthError::MissingCredentials.into())
    }

    /// Returns the region of this session.
    pub fn region(&self) -> &Region {
        &self.inner.region
    }

    pub fn login_endpoint(&self) -> &EndpointUrl {
        &self.inner.login_endpoint
    }

    pub fn iam_endpoint(&self) -> &EndpointUrl {
        &self.inner.iam_endpoint
    }

    /// Timeout applied to Bluemix requests.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub fn username(&self) -> Option<&str> {
        self.inner.username.as_deref()
    }

    pub fn softlayer_account_number(&self) -> Option<&str> {
        self.inner.softlayer_account_number.as_deref()
    }

    pub async fn access_token(&self) -> Option<AccessToken> {
        self.inner.tokens.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner.tokens.read().await.refresh_token.clone()
    }

    pub async fn identity_cookie(&self) -> Option<IdentityCookie> {
        self.inner.tokens.read().await.identity_cookie.clone()
    }

    pub async fn ims_token(&self) -> Option<ImsToken> {
        self.inner.tokens.read().await.ims_token.clone()
    }

    pub async fn ims_user_id(&self) -> Option<i64> {
        self.inner.tokens.read().await.ims_user_id
    }

    /// Export every token for persistence.
    ///
    /// # Security
    ///
    /// Handle the returned tokens securely. They grant access to the account.
    pub async fn tokens(&self) -> TokenSet {
        self.inner.tokens.read().await.clone()
    }

    /// The SoftLayer session, carrying the IMS token when one was acquired.
    pub async fn softlayer_session(&self) -> SoftLayerSession {
        let tokens = self.inner.tokens.read().await;
        match (tokens.ims_user_id, tokens.ims_token.clone()) {
            (Some(user_id), Some(token)) => {
                self.inner.softlayer.clone().with_ims_token(user_id, token)
            }
            _ => self.inner.softlayer.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username())
            .field("region", &self.inner.region)
            .field("login_endpoint", &self.inner.login_endpoint)
            .field("iam_endpoint", &self.inner.iam_endpoint)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

/// Serde adapter for optional secret wrappers, stored as plain strings.
mod secret_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub trait Secret: Sized {
        fn wrap(value: String) -> Self;
        fn expose(&self) -> &str;
    }

    macro_rules! impl_secret {
        ($($t:ty),*) => {$(
            impl Secret for $t {
                fn wrap(value: String) -> Self {
                    <$t>::new(value)
                }
                fn expose(&self) -> &str {
                    self.as_str()
                }
            }
        )*};
    }

    impl_secret!(
        provider_core::AccessToken,
        provider_core::RefreshToken,
        provider_core::IdentityCookie,
        provider_core::ImsToken
    );

    pub fn serialize<T: Secret, S: Serializer>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(v.expose()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T: Secret, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<T>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .filter(|s| !s.is_empty())
            .map(T::wrap))
    }
}
