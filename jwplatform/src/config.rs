//! Client configuration shared by the v1 and v2 transports.

use eyre::Context;
use reqwest::Url;
use std::time::Duration;

/// Production host of the legacy v1 API.
pub const V1_BASE_URL: &str = "https://api.jwplatform.com";
/// Production host of the v2 API.
pub const V2_BASE_URL: &str = "https://api.jwplayer.com";

/// Sent as the `User-Agent` header on every request.
pub const USER_AGENT: &str = concat!("jwplatform-rs/", env!("CARGO_PKG_VERSION"));

/// Settings for constructing API clients.
///
/// The defaults talk to the production hosts. Overriding the base URLs is
/// mostly useful for pointing a client at a staging host or a local mock.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) v1_base_url: Url,
    pub(crate) v2_base_url: Url,
    pub(crate) user_agent: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) strict_body_encoding: bool,
    pub(crate) upload_scheme: String,
    pub(crate) http_client: Option<reqwest::Client>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            v1_base_url: Url::parse(V1_BASE_URL).expect("v1 base url is valid"),
            v2_base_url: Url::parse(V2_BASE_URL).expect("v2 base url is valid"),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
            strict_body_encoding: false,
            upload_scheme: "https".to_string(),
            http_client: None,
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from `JWPLATFORM_*` environment variables.
    ///
    /// * `JWPLATFORM_V1_BASE_URL` / `JWPLATFORM_V2_BASE_URL` override the API hosts
    /// * `JWPLATFORM_TIMEOUT_SECS` sets a per-request timeout
    /// * `JWPLATFORM_STRICT_BODY_ENCODING` (`true`/`false`) controls what happens
    ///   when a v2 request body fails to serialize
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup("JWPLATFORM_V1_BASE_URL") {
            config.v1_base_url = Url::parse(&url).context("parse JWPLATFORM_V1_BASE_URL")?;
        }
        if let Some(url) = lookup("JWPLATFORM_V2_BASE_URL") {
            config.v2_base_url = Url::parse(&url).context("parse JWPLATFORM_V2_BASE_URL")?;
        }
        if let Some(secs) = lookup("JWPLATFORM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().context("parse JWPLATFORM_TIMEOUT_SECS")?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(strict) = lookup("JWPLATFORM_STRICT_BODY_ENCODING") {
            config.strict_body_encoding = strict
                .parse()
                .context("parse JWPLATFORM_STRICT_BODY_ENCODING")?;
        }
        Ok(config)
    }

    pub fn with_v1_base_url(mut self, url: Url) -> Self {
        self.v1_base_url = url;
        self
    }

    pub fn with_v2_base_url(mut self, url: Url) -> Self {
        self.v2_base_url = url;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Bounds every request (connect through body read) by `timeout`.
    ///
    /// Ignored when a custom HTTP client is supplied with [`Self::with_http_client`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// When set, a v2 request body that fails to serialize is reported as an
    /// error instead of being replaced by an empty body.
    pub fn with_strict_body_encoding(mut self, strict: bool) -> Self {
        self.strict_body_encoding = strict;
        self
    }

    /// Scheme used to reach the v1 upload host returned by `/videos/create`.
    ///
    /// Uploads go over `https` whatever `protocol` the API reports. Only a
    /// plain-HTTP test server needs anything else.
    pub fn with_upload_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.upload_scheme = scheme.into();
        self
    }

    /// Shares an existing connection pool instead of building a new one.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn v1_base_url(&self) -> &Url {
        &self.v1_base_url
    }

    pub fn v2_base_url(&self) -> &Url {
        &self.v2_base_url
    }

    pub(crate) fn http_client(&self) -> eyre::Result<reqwest::Client> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("build HTTP client")
    }
}
