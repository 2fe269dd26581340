//! Async client for the JW Platform video management API.
//!
//! Two API generations are supported side by side:
//!
//! * [`v1`]: the legacy API, authenticated by signing every query string
//!   with the account's key and secret.
//! * [`v2`]: the current API, authenticated with a bearer token, with typed
//!   clients for media, live channels, players, webhooks and multipart uploads.
//!
//! Every fallible operation returns [`eyre::Result`]. Structured errors from
//! the v2 API travel inside the report as an [`ApiError`]; use
//! [`FailureKind::of`] or `downcast_ref` to tell them apart from transport and
//! decoding failures.
//!
//! ```rust,no_run
//! # async fn example() -> eyre::Result<()> {
//! let platform = jwplatform::JwPlatform::new("API_SECRET");
//! let media = platform.media.get("SITE_ID", "MEDIA_ID").await?;
//! println!("{}", media.metadata.title);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod v1;
pub mod v2;

pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorEntry, FailureKind};

use v2::{ChannelsClient, MediaClient, PlayersClient, UploadsClient, V2Client, WebhooksClient};

/// All v2 resource clients, sharing one authenticated transport.
#[derive(Debug, Clone)]
pub struct JwPlatform {
    pub media: MediaClient,
    pub channels: ChannelsClient,
    pub players: PlayersClient,
    pub webhooks: WebhooksClient,
    pub uploads: UploadsClient,
}

impl JwPlatform {
    /// Creates clients for the production API, authenticated with `api_secret`.
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self::from_client(V2Client::new(api_secret))
    }

    pub fn with_config(api_secret: impl Into<String>, config: &ClientConfig) -> eyre::Result<Self> {
        Ok(Self::from_client(V2Client::with_config(api_secret, config)?))
    }

    /// Wraps an existing transport.
    pub fn from_client(client: V2Client) -> Self {
        Self {
            media: MediaClient::new(client.clone()),
            channels: ChannelsClient::new(client.clone()),
            players: PlayersClient::new(client.clone()),
            webhooks: WebhooksClient::new(client.clone()),
            uploads: UploadsClient::new(client),
        }
    }
}
