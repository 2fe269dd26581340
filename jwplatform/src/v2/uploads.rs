//! Multipart upload API.
//!
//! A media item created with the `multipart` upload method returns an
//! `upload_id`; each part is PUT to its pre-signed link and the upload is then
//! marked complete here.

use crate::v2::client::V2Client;
use crate::v2::types::ResourcesResponse;
use http::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One byte range of a multipart upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPart {
    /// 1-based part number.
    pub number: u32,
    /// Pre-signed URL to PUT the part to. Absent once the part is uploaded.
    pub upload_link: Option<String>,
    /// Entity tag of an uploaded part.
    pub etag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadPartsResponse {
    #[serde(flatten)]
    pub page: ResourcesResponse,
    #[serde(default)]
    pub parts: Vec<UploadPart>,
}

#[derive(Debug, Clone)]
pub struct UploadsClient {
    client: V2Client,
}

impl UploadsClient {
    pub fn new(client: V2Client) -> Self {
        Self { client }
    }

    /// Lists every part of an upload, completed or not.
    #[instrument(skip(self))]
    pub async fn list_parts(&self, upload_id: &str) -> eyre::Result<UploadPartsResponse> {
        self.client
            .get(&format!("/v2/uploads/{upload_id}/parts"), None)
            .await
    }

    /// Marks an upload as complete. All parts must have been uploaded.
    #[instrument(skip(self))]
    pub async fn complete(&self, upload_id: &str) -> eyre::Result<()> {
        let path = format!("/v2/uploads/{upload_id}/complete");
        let _: IgnoredAny = self
            .client
            .request(Method::PUT, &path, None::<&()>, None)
            .await?;
        Ok(())
    }
}
