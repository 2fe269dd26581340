//! Webhook API types and functionality.
//!
//! Webhooks are account-wide rather than per-property, so their paths do not
//! include a site ID.

use crate::v2::client::V2Client;
use crate::v2::types::{QueryParams, ResourceResponse, ResourcesResponse};
use http::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookResource {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    #[serde(default)]
    pub metadata: WebhookMetadata,
}

/// Response of the webhook create call.
///
/// `secret` is only ever returned here. It is the shared key used to verify
/// the signature of incoming webhook deliveries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateWebhookResponse {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    #[serde(default)]
    pub metadata: WebhookMetadata,
    #[serde(default)]
    pub secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Event names to deliver, e.g. `media_available`.
    pub events: Vec<String>,
    #[serde(rename = "site_ids")]
    pub sites: Vec<String>,
    pub webhook_url: String,
}

#[derive(Debug, Serialize)]
struct WebhookWriteRequest<'a> {
    metadata: &'a WebhookMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookResourcesResponse {
    #[serde(flatten)]
    pub page: ResourcesResponse,
    #[serde(default)]
    pub webhooks: Vec<WebhookResource>,
}

/// Client for the v2 webhooks API.
#[derive(Debug, Clone)]
pub struct WebhooksClient {
    client: V2Client,
}

impl WebhooksClient {
    pub fn new(client: V2Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, webhook_id: &str) -> eyre::Result<WebhookResource> {
        self.client
            .get(&format!("/v2/webhooks/{webhook_id}"), None)
            .await
    }

    #[instrument(skip(self, metadata))]
    pub async fn create(&self, metadata: &WebhookMetadata) -> eyre::Result<CreateWebhookResponse> {
        let webhook: CreateWebhookResponse = self
            .client
            .request(
                Method::POST,
                "/v2/webhooks",
                Some(&WebhookWriteRequest { metadata }),
                None,
            )
            .await?;

        tracing::debug!(webhook_id = webhook.resource.id, "created webhook");
        Ok(webhook)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, params: Option<&QueryParams>) -> eyre::Result<WebhookResourcesResponse> {
        self.client.get("/v2/webhooks", params).await
    }

    #[instrument(skip(self, metadata))]
    pub async fn update(
        &self,
        webhook_id: &str,
        metadata: &WebhookMetadata,
    ) -> eyre::Result<WebhookResource> {
        let path = format!("/v2/webhooks/{webhook_id}");
        self.client
            .request(
                Method::PATCH,
                &path,
                Some(&WebhookWriteRequest { metadata }),
                None,
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, webhook_id: &str) -> eyre::Result<()> {
        let path = format!("/v2/webhooks/{webhook_id}");
        let _: IgnoredAny = self
            .client
            .request(Method::DELETE, &path, None::<&()>, None)
            .await?;
        Ok(())
    }
}
