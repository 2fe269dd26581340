//! Player configuration API types and functionality.

use crate::v2::client::V2Client;
use crate::v2::types::{QueryParams, ResourceResponse, ResourcesResponse};
use http::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerResource {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    #[serde(default)]
    pub metadata: PlayerMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerMetadata {
    pub name: String,
    /// Player release channel, e.g. `production` or `beta`.
    pub release_channel: String,
    /// Free-form player setup configuration.
    pub setup_config: serde_json::Map<String, serde_json::Value>,
    pub custom_params: BTreeMap<String, String>,
}

/// Optional links from a new player to other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRelationships {
    pub recommendations_playlist_id: Option<String>,
    pub ad_schedule_id: Option<String>,
}

impl PlayerRelationships {
    fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut relationships = serde_json::Map::new();
        if let Some(id) = self.recommendations_playlist_id.as_deref().filter(|id| !id.is_empty()) {
            relationships.insert(
                "recommendations_playlist".into(),
                serde_json::json!({ "id": id }),
            );
        }
        if let Some(id) = self.ad_schedule_id.as_deref().filter(|id| !id.is_empty()) {
            relationships.insert("adschedule".into(), serde_json::json!({ "id": id }));
        }
        relationships
    }
}

#[derive(Debug, Serialize)]
struct PlayerWriteRequest<'a> {
    metadata: &'a PlayerMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    relationships: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerResourcesResponse {
    #[serde(flatten)]
    pub page: ResourcesResponse,
    #[serde(default)]
    pub players: Vec<PlayerResource>,
}

/// Client for the v2 players API.
#[derive(Debug, Clone)]
pub struct PlayersClient {
    client: V2Client,
}

impl PlayersClient {
    pub fn new(client: V2Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, site_id: &str, player_id: &str) -> eyre::Result<PlayerResource> {
        let path = format!("/v2/sites/{site_id}/players/{player_id}");
        self.client.get(&path, None).await
    }

    #[instrument(skip(self, metadata))]
    pub async fn create(
        &self,
        site_id: &str,
        metadata: &PlayerMetadata,
        relationships: Option<&PlayerRelationships>,
    ) -> eyre::Result<PlayerResource> {
        let path = format!("/v2/sites/{site_id}/players");
        let body = PlayerWriteRequest {
            metadata,
            relationships: Some(relationships.map(PlayerRelationships::to_json).unwrap_or_default()),
        };
        let player: PlayerResource = self
            .client
            .request(Method::POST, &path, Some(&body), None)
            .await?;

        tracing::debug!(player_id = player.resource.id, "created player");
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        site_id: &str,
        params: Option<&QueryParams>,
    ) -> eyre::Result<PlayerResourcesResponse> {
        let path = format!("/v2/sites/{site_id}/players");
        self.client.get(&path, params).await
    }

    #[instrument(skip(self, metadata))]
    pub async fn update(
        &self,
        site_id: &str,
        player_id: &str,
        metadata: &PlayerMetadata,
    ) -> eyre::Result<PlayerResource> {
        let path = format!("/v2/sites/{site_id}/players/{player_id}");
        let body = PlayerWriteRequest {
            metadata,
            relationships: None,
        };
        self.client
            .request(Method::PATCH, &path, Some(&body), None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, site_id: &str, player_id: &str) -> eyre::Result<()> {
        let path = format!("/v2/sites/{site_id}/players/{player_id}");
        let _: IgnoredAny = self
            .client
            .request(Method::DELETE, &path, None::<&()>, None)
            .await?;
        Ok(())
    }
}
