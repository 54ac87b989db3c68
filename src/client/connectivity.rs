use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::envelope::Envelope;
use crate::identity::{IdentityMethod, LoginRequest, Role, SignupRequest};

use super::ClientError;

/// The calls the session resolver and the login form depend on.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// One credentialed "who am I" request for `role`.
    async fn fetch_identity(&self, role: Role) -> Result<Envelope<Value>, ClientError>;

    /// Log in; on success the response payload is the identity and the backend sets the role cookie.
    async fn login(&self, req: &LoginRequest) -> Result<Envelope<Value>, ClientError>;
}

/// Cookie-carrying client for the portal API. Every request includes the stored cookies, which is
/// how the backend's per-role session cookies travel.
#[derive(Clone)]
pub struct PortalClient {
    base: Url,
    client: reqwest::Client,
}

impl PortalClient {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;
        Self::with_client(api_url, client)
    }

    pub fn with_client(api_url: &str, client: reqwest::Client) -> Result<Self, ClientError> {
        // Relative joins replace the last path segment unless the base ends with '/'.
        let mut base = api_url.trim().to_string();
        if !base.ends_with('/') { base.push('/'); }
        let base = Url::parse(&base).map_err(|e| ClientError::Url(format!("{api_url}: {e}")))?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url { &self.base }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Url(format!("{path}: {e}")))
    }

    /// Send a request and decode the envelope whatever the HTTP status: the backend answers
    /// failures (401 included) with the same `{success, message}` shape.
    pub(crate) async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Envelope<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(target: "api", %method, %url, "request");
        let mut req = self.client.request(method, url).header(reqwest::header::ACCEPT, "application/json");
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map_err(|e| ClientError::Decode(format!("HTTP {status}: {e}")))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ClientError> {
        self.call::<Value, T>(Method::GET, path, None).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Envelope<T>, ClientError> {
        self.call(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Envelope<T>, ClientError> {
        self.call(Method::PUT, path, Some(body)).await
    }

    pub(crate) async fn delete<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Envelope<T>, ClientError> {
        self.call(Method::DELETE, path, Some(body)).await
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<Envelope<Value>, ClientError> {
        let path = req
            .role()
            .signup_path()
            .ok_or_else(|| ClientError::Url(format!("{} accounts cannot sign up", req.role())))?;
        self.post(&path, &req.body()).await
    }

    /// Invalidate the role's cookie server-side. The caller ends the page mount afterwards.
    pub async fn logout(&self, role: Role) -> Result<Envelope<Value>, ClientError> {
        self.call::<Value, Value>(Method::POST, &role.logout_path(), None).await
    }
}

#[async_trait]
impl IdentityBackend for PortalClient {
    async fn fetch_identity(&self, role: Role) -> Result<Envelope<Value>, ClientError> {
        let method = match role.identity_method() {
            IdentityMethod::Get => Method::GET,
            IdentityMethod::Post => Method::POST,
        };
        self.call::<Value, Value>(method, &role.identity_path(), None).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<Envelope<Value>, ClientError> {
        self.post(&req.role.login_path(), &req.body()).await
    }
}
