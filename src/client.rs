// src/client.rs
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use http::Method;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Thin adapter over `reqwest` that every store and the session share.
///
/// Clones share the cookie jar and bearer token, so a login performed through
/// one handle authenticates all of them.
#[derive(Clone)]
pub struct HttpClient {
    base_url: Arc<str>,
    timeout: Duration,
    credentials: Arc<RwLock<Credentials>>,
}

struct Credentials {
    client: reqwest::Client,
    jar: Arc<Jar>,
    bearer: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let client = build_client(config.timeout, jar.clone())?;
        Ok(Self {
            base_url: Arc::from(config.api_url.trim_end_matches('/')),
            timeout: config.timeout,
            credentials: Arc::new(RwLock::new(Credentials { client, jar, bearer: None })),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_bearer_token(&self, token: Option<String>) {
        self.write().bearer = token.filter(|t| !t.is_empty());
    }

    pub fn has_bearer_token(&self) -> bool {
        self.read().bearer.is_some()
    }

    /// Forgets the bearer token and starts over with an empty cookie jar.
    pub fn reset_credentials(&self) -> Result<(), ApiError> {
        let jar = Arc::new(Jar::default());
        let client = build_client(self.timeout, jar.clone())?;
        let mut creds = self.write();
        creds.client = client;
        creds.jar = jar;
        creds.bearer = None;
        Ok(())
    }

    /// The `Cookie` header the jar would send to the backend, if any.
    pub fn session_cookies(&self) -> Option<String> {
        let url = self.root_url()?;
        let header = self.read().jar.cookies(&url)?;
        header.to_str().ok().map(str::to_string)
    }

    /// Seeds the jar from a header captured by [`HttpClient::session_cookies`].
    pub fn restore_session_cookies(&self, header: &str) {
        let Some(url) = self.root_url() else {
            tracing::warn!(base_url = %self.base_url, "cannot restore cookies for an unparsable base url");
            return;
        };
        let creds = self.read();
        for cookie in header.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            creds.jar.add_cookie_str(cookie, &url);
        }
    }

    /// Issues one request. Non-2xx answers become `ApiError::Rejected` carrying
    /// the backend's `error`/`message` text or `fallback`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        if body.is_none() && requires_body(&method) {
            return Err(ApiError::validation(format!("{method} {path} requires a request body")));
        }

        let url = self.url(path);
        let (client, bearer) = {
            let creds = self.read();
            (creds.client.clone(), creds.bearer.clone())
        };

        let mut req = client.request(method.clone(), &url);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        let response = req.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "no response from backend");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "failed reading response body");
            ApiError::Network(e.to_string())
        })?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            let err = ApiError::rejected(status.as_u16(), body.as_ref(), fallback);
            tracing::warn!(%method, %url, status = status.as_u16(), error = %err, "backend rejected request");
            return Err(err);
        }

        tracing::debug!(%method, %url, status = status.as_u16(), "request succeeded");
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{method} {url}: {e}")))
    }

    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(method, path, Some(&body), fallback).await
    }

    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let value = self.request(method, path, body, fallback).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn root_url(&self) -> Option<Url> {
        Url::parse(&format!("{}/", self.base_url)).ok()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn read(&self) -> RwLockReadGuard<'_, Credentials> {
        self.credentials.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Credentials> {
        self.credentials.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn requires_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn build_client(timeout: Duration, jar: Arc<Jar>) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .cookie_provider(jar)
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))
}
