//! Client for the legacy v1 JW Platform API.
//!
//! Version 1 authenticates every call by signing its query string with the
//! account's API secret (see [`signature`]). Responses are always JSON and are
//! decoded into whatever type the caller asks for, regardless of the HTTP
//! status: the v1 API reports failures inside the body (`"status": "error"`),
//! so interpreting them is left to the caller.
//!
//! ```rust,no_run
//! # async fn example() -> eyre::Result<()> {
//! use jwplatform::v1::{Client, Params};
//!
//! let client = jwplatform::v1::Client::new("API_KEY", "API_SECRET");
//! let mut params = Params::new();
//! params.set("video_key", "gIRtMhYM");
//! let video: serde_json::Value = client
//!     .make_request(http::Method::GET, "/videos/show", Some(params))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod params;
pub mod signature;
pub mod upload;

pub use params::Params;
pub use signature::{Clock, Credentials, NonceSource, RandomNonce, SystemClock};

use crate::config::ClientConfig;
use eyre::Context;
use http::Method;
use http::header::{ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;

/// Path prefix every v1 endpoint lives under.
pub const API_VERSION: &str = "v1";

/// Signed-request client for the v1 API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    credentials: Credentials,
    base_url: Url,
    user_agent: String,
    upload_scheme: String,
    http: reqwest::Client,
    nonce: Arc<dyn NonceSource>,
    clock: Arc<dyn Clock>,
}

impl Client {
    /// Creates a client for the production v1 API.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        let config = ClientConfig::default();
        Self::from_parts(
            Credentials::new(api_key, api_secret),
            &config,
            reqwest::Client::new(),
        )
    }

    pub fn with_config(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        config: &ClientConfig,
    ) -> eyre::Result<Self> {
        let http = config.http_client()?;
        Ok(Self::from_parts(
            Credentials::new(api_key, api_secret),
            config,
            http,
        ))
    }

    fn from_parts(credentials: Credentials, config: &ClientConfig, http: reqwest::Client) -> Self {
        Self {
            credentials,
            base_url: config.v1_base_url.clone(),
            user_agent: config.user_agent.clone(),
            upload_scheme: config.upload_scheme.clone(),
            http,
            nonce: Arc::new(RandomNonce),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the source of `api_nonce` values.
    pub fn with_nonce_source(mut self, nonce: impl NonceSource + 'static) -> Self {
        self.nonce = Arc::new(nonce);
        self
    }

    /// Replaces the source of `api_timestamp` values.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Injects the authentication parameters into `params` and signs them.
    ///
    /// A fresh nonce and timestamp are drawn on every call.
    pub fn sign(&self, params: Option<Params>) -> Params {
        signature::sign(
            params.unwrap_or_default(),
            &self.credentials,
            &self.nonce.nonce(),
            self.clock.unix_seconds(),
        )
    }

    /// Builds the absolute, signed URL for `path` (relative to `/v1`).
    pub fn signed_url(&self, path: &str, params: Option<Params>) -> eyre::Result<Url> {
        let mut url = self
            .base_url
            .join(&join_path(API_VERSION, path))
            .with_context(|| format!("build v1 URL for {path}"))?;
        url.set_query(Some(&self.sign(params).encode()));
        Ok(url)
    }

    /// Makes a signed request and decodes the JSON response body into `T`.
    ///
    /// The body is decoded whatever the response status is. Network failures
    /// are returned as-is and never retried; dropping the returned future
    /// aborts the request.
    #[instrument(skip(self, params), level = tracing::Level::TRACE)]
    pub async fn make_request<T>(
        &self,
        method: Method,
        path: &str,
        params: Option<Params>,
    ) -> eyre::Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.signed_url(path, params)?;

        let response = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .with_context(|| format!("send {method} request to v1 API: {path}"))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("read v1 API {method} {path} response body"))?;
        tracing::trace!(%status, bytes = body.len(), "received v1 API response");

        serde_json::from_slice(&body)
            .with_context(|| format!("parse v1 API {method} {path} response as JSON"))
    }
}

/// Joins `part` under `prefix` the way a URL path join would, dropping empty
/// and `.` segments and resolving `..`.
fn join_path(prefix: &str, part: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in prefix.split('/').chain(part.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct FixedNonce(&'static str);

    impl NonceSource for FixedNonce {
        fn nonce(&self) -> String {
            self.0.to_string()
        }
    }

    #[derive(Debug)]
    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn unix_seconds(&self) -> i64 {
            self.0
        }
    }

    fn pinned_client() -> Client {
        Client::new("API_KEY", "API_SECRET")
            .with_nonce_source(FixedNonce("12345678"))
            .with_clock(FixedClock(1_700_000_000))
    }

    #[test]
    fn join_path_cleans_segments() {
        assert_eq!(join_path("v1", "/videos/show"), "v1/videos/show");
        assert_eq!(join_path("v1", "/videos/show/"), "v1/videos/show");
        assert_eq!(join_path("v1", "videos//create"), "v1/videos/create");
        assert_eq!(join_path("v1", "./videos/../accounts/show"), "v1/accounts/show");
        assert_eq!(join_path("v1", ""), "v1");
    }

    #[test]
    fn signed_url_contains_all_auth_params() {
        let mut params = Params::new();
        params.set("video_key", "VIDEO_KEY");
        let url = Client::new("API_KEY", "API_SECRET")
            .signed_url("/videos/show", Some(params))
            .unwrap();

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.jwplatform.com"));
        assert_eq!(url.path(), "/v1/videos/show");

        let query = Params::parse(url.query().unwrap());
        assert_eq!(query.get("api_format"), Some("json"));
        assert_eq!(query.get("api_key"), Some("API_KEY"));
        assert_eq!(query.get("video_key"), Some("VIDEO_KEY"));
        assert!(query.contains_key("api_nonce"));
        assert!(query.contains_key("api_signature"));
        assert!(query.contains_key("api_timestamp"));
    }

    #[test]
    fn pinned_nonce_and_clock_give_a_stable_signature() {
        let mut params = Params::new();
        params.set("video_key", "VIDEO_KEY");
        let signed = pinned_client().sign(Some(params.clone()));
        assert_eq!(signed.get("api_nonce"), Some("12345678"));
        assert_eq!(signed.get("api_timestamp"), Some("1700000000"));
        assert_eq!(
            signed.get("api_signature"),
            Some("8647dbc18f2b10c39c0eabb3a4c536849bc0c3cd")
        );
        assert_eq!(pinned_client().sign(Some(params)), signed);
    }

    #[test]
    fn nonce_changes_between_requests() {
        let client = Client::new("API_KEY", "API_SECRET");
        let nonces: std::collections::HashSet<String> = (0..20)
            .map(|_| client.sign(None).get("api_nonce").unwrap().to_string())
            .collect();
        assert!(nonces.len() > 1);
    }
}
