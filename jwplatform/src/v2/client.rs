//! Bearer-authenticated transport for the v2 API.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::v2::types::QueryParams;
use eyre::Context;
use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::instrument;

/// Path prefix every v2 endpoint lives under.
pub const API_VERSION: &str = "v2";

/// The secret presented in the `Authorization: Bearer` header.
#[derive(Clone, PartialEq, Eq)]
struct BearerToken(String);

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Low-level client for the v2 API.
///
/// Resource clients such as [`crate::v2::MediaClient`] are thin wrappers around
/// [`V2Client::request`]. Use it directly for endpoints this crate does not
/// model yet. Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct V2Client {
    auth_token: BearerToken,
    base_url: Url,
    user_agent: String,
    strict_body_encoding: bool,
    http: reqwest::Client,
}

impl V2Client {
    /// Creates a client for the production v2 API.
    pub fn new(auth_token: impl Into<String>) -> Self {
        let config = ClientConfig::default();
        Self::from_parts(auth_token.into(), &config, reqwest::Client::new())
    }

    pub fn with_config(auth_token: impl Into<String>, config: &ClientConfig) -> eyre::Result<Self> {
        let http = config.http_client()?;
        Ok(Self::from_parts(auth_token.into(), config, http))
    }

    fn from_parts(auth_token: String, config: &ClientConfig, http: reqwest::Client) -> Self {
        Self {
            auth_token: BearerToken(auth_token),
            base_url: config.v2_base_url.clone(),
            user_agent: config.user_agent.clone(),
            strict_body_encoding: config.strict_body_encoding,
            http,
        }
    }

    /// Resolves an absolute API path such as `/v2/webhooks` against the base host.
    pub fn url_from_path(&self, path: &str) -> eyre::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("resolve v2 API path {path}"))
    }

    /// Makes an authenticated request and decodes the response.
    ///
    /// * `body`, when given, is sent as JSON. If it cannot be serialized, an
    ///   empty body is sent instead, unless the client was configured with
    ///   strict body encoding, in which case the error is returned and nothing
    ///   is sent.
    /// * `query` is URL-encoded (sorted by key) and appended to the URL.
    ///
    /// A response with status 400 or above is returned as an [`ApiError`]. Any
    /// other response is decoded into `T`; an empty body decodes to
    /// `T::default()`. The response body is always read to the end.
    #[instrument(skip(self, body, query), level = tracing::Level::TRACE)]
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&[(&str, &str)]>,
    ) -> eyre::Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let mut url = self.url_from_path(path)?;
        if let Some(query) = query {
            let encoded = encode_query(query);
            if !encoded.is_empty() {
                url.set_query(Some(&encoded));
            }
        }

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", self.auth_token.0))
            .header(USER_AGENT, &self.user_agent);

        if let Some(body) = body {
            match serde_json::to_vec(body) {
                Ok(payload) => {
                    request = request
                        .header(CONTENT_TYPE, "application/json")
                        .body(payload);
                }
                Err(e) if self.strict_body_encoding => {
                    return Err(e)
                        .with_context(|| format!("serialize {method} {path} request body"));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "request body failed to serialize, sending it empty");
                    request = request.body(Vec::new());
                }
            }
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("send {method} request to v2 API: {path}"))?;

        let status = response.status();
        let payload = response
            .bytes()
            .await
            .with_context(|| format!("read v2 API {method} {path} response body"))?;
        tracing::trace!(%status, bytes = payload.len(), "received v2 API response");

        if status.as_u16() >= 400 {
            let error = ApiError::from_response(status.as_u16(), &payload).with_context(|| {
                format!("parse v2 API {method} {path} error response ({status}) as JSON")
            })?;
            return Err(error.into());
        }

        decode_or_default(&payload)
            .with_context(|| format!("parse v2 API {method} {path} response as JSON"))
    }

    /// Shorthand for a body-less `GET` with optional list parameters.
    pub(crate) async fn get<T>(&self, path: &str, params: Option<&QueryParams>) -> eyre::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let pairs = params.map(QueryParams::to_pairs).unwrap_or_default();
        let query: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.request(
            Method::GET,
            path,
            None::<&()>,
            params.map(|_| query.as_slice()),
        )
        .await
    }
}

/// URL-encodes `pairs` with keys in ascending order.
pub(crate) fn encode_query(pairs: &[(&str, &str)]) -> String {
    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(sorted)
        .finish()
}

/// Decodes `payload` into `T`, treating an empty body as `T::default()`.
fn decode_or_default<T>(payload: &[u8]) -> serde_json::Result<T>
where
    T: DeserializeOwned + Default,
{
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(payload)
}
