//! Live channel API types and functionality.

use crate::v2::client::V2Client;
use crate::v2::types::{QueryParams, ResourceResponse, ResourcesResponse};
use http::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// A live channel: a persistent ingest point that produces events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelResource {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    #[serde(default)]
    pub metadata: ChannelMetadata,
    /// Latency mode, e.g. `default` or `low`.
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub recent_events: Vec<RecentEvent>,
    /// Seconds the channel waits for the encoder to reconnect before ending the event.
    #[serde(default)]
    pub reconnect_window: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stream_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentEvent {
    pub media_id: String,
    pub status: String,
}

/// Editable description of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMetadata {
    pub custom_params: BTreeMap<String, String>,
    pub dvr: String,
    pub simulcast_targets: Vec<SimulcastTarget>,
    pub tags: Vec<String>,
    pub title: String,
}

/// Additional fields that can only be set when creating a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCreateMetadata {
    #[serde(flatten)]
    pub metadata: ChannelMetadata,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub reconnect_window: u32,
}

/// A third-party RTMP destination the channel re-streams to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulcastTarget {
    pub stream_key: String,
    pub stream_url: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
struct ChannelWriteRequest<'a, M> {
    metadata: &'a M,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelResourcesResponse {
    #[serde(flatten)]
    pub page: ResourcesResponse,
    #[serde(default)]
    pub channels: Vec<ChannelResource>,
}

/// Client for the v2 live channels API.
#[derive(Debug, Clone)]
pub struct ChannelsClient {
    client: V2Client,
}

impl ChannelsClient {
    pub fn new(client: V2Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, site_id: &str, channel_id: &str) -> eyre::Result<ChannelResource> {
        let path = format!("/v2/sites/{site_id}/channels/{channel_id}");
        self.client.get(&path, None).await
    }

    #[instrument(skip(self, metadata))]
    pub async fn create(
        &self,
        site_id: &str,
        metadata: &ChannelCreateMetadata,
    ) -> eyre::Result<ChannelResource> {
        let path = format!("/v2/sites/{site_id}/channels");
        let channel: ChannelResource = self
            .client
            .request(Method::POST, &path, Some(&ChannelWriteRequest { metadata }), None)
            .await?;

        tracing::debug!(channel_id = channel.resource.id, "created channel");
        Ok(channel)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        site_id: &str,
        params: Option<&QueryParams>,
    ) -> eyre::Result<ChannelResourcesResponse> {
        let path = format!("/v2/sites/{site_id}/channels");
        self.client.get(&path, params).await
    }

    #[instrument(skip(self, metadata))]
    pub async fn update(
        &self,
        site_id: &str,
        channel_id: &str,
        metadata: &ChannelMetadata,
    ) -> eyre::Result<ChannelResource> {
        let path = format!("/v2/sites/{site_id}/channels/{channel_id}");
        self.client
            .request(Method::PATCH, &path, Some(&ChannelWriteRequest { metadata }), None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, site_id: &str, channel_id: &str) -> eyre::Result<()> {
        let path = format!("/v2/sites/{site_id}/channels/{channel_id}");
        let _: IgnoredAny = self
            .client
            .request(Method::DELETE, &path, None::<&()>, None)
            .await?;
        Ok(())
    }
}
