//! Media API types and functionality.

use crate::v2::client::V2Client;
use crate::v2::types::{QueryParams, ResourceResponse, ResourcesResponse};
use http::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// A media item (video or audio) in a property.
///
/// See: <https://docs.jwplayer.com/platform/reference/get_v2-sites-site-id-media-media-id->
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaResource {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub trim_in_point: String,
    #[serde(default)]
    pub trim_out_point: String,
    /// Processing status, e.g. `processing`, `ready` or `failed`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub hosting_type: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub metadata: MediaMetadata,
}

/// Editable description of a media item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub permalink: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub publish_start_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub publish_end_date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_params: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,
}

/// How the media's source file gets to the platform.
///
/// `method` is one of `direct` (the default), `multipart`, `external` or
/// `fetch`. `mime_type` is required for `direct` and `source_url` for `fetch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upload {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trim_in_point: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trim_out_point: String,
}

/// Response of media create and reupload calls.
///
/// Direct uploads get a pre-signed `upload_link`; multipart uploads get an
/// `upload_id` and `upload_token` for the uploads API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMediaResponse {
    #[serde(flatten)]
    pub media: MediaResource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateMediaRequest<'a> {
    metadata: &'a MediaMetadata,
    upload: &'a Upload,
}

#[derive(Debug, Serialize)]
struct ReuploadRequest<'a> {
    upload: &'a Upload,
}

#[derive(Debug, Serialize)]
struct UpdateMediaRequest<'a> {
    metadata: &'a MediaMetadata,
}

/// Response of the media list call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaResourcesResponse {
    #[serde(flatten)]
    pub page: ResourcesResponse,
    #[serde(default)]
    pub media: Vec<MediaResource>,
}

/// Client for the v2 media API.
#[derive(Debug, Clone)]
pub struct MediaClient {
    client: V2Client,
}

impl MediaClient {
    pub fn new(client: V2Client) -> Self {
        Self { client }
    }

    /// Fetches a single media item.
    #[instrument(skip(self))]
    pub async fn get(&self, site_id: &str, media_id: &str) -> eyre::Result<MediaResource> {
        let path = format!("/v2/sites/{site_id}/media/{media_id}");
        self.client.get(&path, None).await
    }

    /// Creates a media item using the default (`direct`) upload method.
    #[instrument(skip(self, metadata))]
    pub async fn create(
        &self,
        site_id: &str,
        metadata: &MediaMetadata,
    ) -> eyre::Result<CreateMediaResponse> {
        self.create_with_upload(site_id, metadata, &Upload::default())
            .await
    }

    /// Creates a media item with an explicit upload method.
    #[instrument(skip(self, metadata, upload))]
    pub async fn create_with_upload(
        &self,
        site_id: &str,
        metadata: &MediaMetadata,
        upload: &Upload,
    ) -> eyre::Result<CreateMediaResponse> {
        let path = format!("/v2/sites/{site_id}/media");
        let body = CreateMediaRequest { metadata, upload };
        let media: CreateMediaResponse = self
            .client
            .request(Method::POST, &path, Some(&body), None)
            .await?;

        tracing::debug!(media_id = media.media.resource.id, "created media");
        Ok(media)
    }

    /// Lists the media in a property.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        site_id: &str,
        params: Option<&QueryParams>,
    ) -> eyre::Result<MediaResourcesResponse> {
        let path = format!("/v2/sites/{site_id}/media");
        let media: MediaResourcesResponse = self.client.get(&path, params).await?;

        tracing::debug!(
            total = media.page.total,
            returned_items = media.media.len(),
            "fetched media"
        );
        Ok(media)
    }

    /// Replaces the metadata of a media item.
    #[instrument(skip(self, metadata))]
    pub async fn update(
        &self,
        site_id: &str,
        media_id: &str,
        metadata: &MediaMetadata,
    ) -> eyre::Result<MediaResource> {
        let path = format!("/v2/sites/{site_id}/media/{media_id}");
        let body = UpdateMediaRequest { metadata };
        self.client
            .request(Method::PATCH, &path, Some(&body), None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, site_id: &str, media_id: &str) -> eyre::Result<()> {
        let path = format!("/v2/sites/{site_id}/media/{media_id}");
        let _: IgnoredAny = self
            .client
            .request(Method::DELETE, &path, None::<&()>, None)
            .await?;
        Ok(())
    }

    /// Replaces the source file of an existing media item.
    #[instrument(skip(self, upload))]
    pub async fn reupload(
        &self,
        site_id: &str,
        media_id: &str,
        upload: &Upload,
    ) -> eyre::Result<CreateMediaResponse> {
        let path = format!("/v2/sites/{site_id}/media/{media_id}/reupload");
        let body = ReuploadRequest { upload };
        self.client
            .request(Method::POST, &path, Some(&body), None)
            .await
    }
}
