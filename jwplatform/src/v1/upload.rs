//! Direct (two-phase) video upload through the v1 API.
//!
//! 1. `POST /v1/videos/create` registers the video and returns an upload `link`.
//! 2. The file is posted as multipart form data to that link.

use crate::v1::signature::{FORMAT, FORMAT_PARAM};
use crate::v1::{Client, Params};
use eyre::Context;
use http::Method;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Response of `/videos/create`.
#[derive(Debug, Deserialize)]
pub struct CreateVideoResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub link: Option<UploadLink>,
}

/// Where to send the file, as returned by `/videos/create`.
#[derive(Debug, Deserialize)]
pub struct UploadLink {
    /// Scheme the API suggests. Not used: uploads always go over `https`.
    #[serde(default)]
    pub protocol: Option<String>,
    pub address: String,
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, serde_json::Value>,
}

impl UploadLink {
    /// Absolute `https` URL to post the file to.
    ///
    /// The link's query values are sent as given, followed by `api_format=json`.
    pub fn url(&self) -> eyre::Result<Url> {
        self.url_with_scheme("https")
    }

    pub(crate) fn url_with_scheme(&self, scheme: &str) -> eyre::Result<Url> {
        let mut url = Url::parse(&format!("{scheme}://{}{}", self.address, self.path))
            .context("parse upload link")?;

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            match value {
                serde_json::Value::String(s) => query.append_pair(key, s),
                other => query.append_pair(key, &other.to_string()),
            };
        }
        query.append_pair(FORMAT_PARAM, FORMAT);
        url.set_query(Some(&query.finish()));
        Ok(url)
    }
}

impl Client {
    /// Creates a video with `params` and uploads the file at `path` into it.
    ///
    /// A leading `~` in `path` is expanded to the user's home directory. The
    /// JSON response of the upload endpoint is decoded into `T`.
    #[instrument(skip(self, params), level = tracing::Level::DEBUG)]
    pub async fn upload<T>(&self, path: &Path, params: Option<Params>) -> eyre::Result<T>
    where
        T: DeserializeOwned,
    {
        let created: CreateVideoResponse = self
            .make_request(Method::POST, "/videos/create/", params)
            .await
            .context("create video")?;

        if created.status != "ok" {
            eyre::bail!(
                "Error creating video: {}",
                created.message.as_deref().unwrap_or("unknown error")
            );
        }
        let Some(link) = created.link else {
            eyre::bail!("video creation response did not include an upload link");
        };
        let upload_url = link.url_with_scheme(&self.upload_scheme)?;

        let path = expand_home(path);
        let contents = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        tracing::debug!(file = %path.display(), bytes = contents.len(), "uploading video file");

        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name));
        let response = self
            .http
            .post(upload_url)
            .multipart(form)
            .send()
            .await
            .context("post video file to upload link")?;

        let body = response
            .bytes()
            .await
            .context("read upload response body")?;
        serde_json::from_slice(&body).context("parse upload response as JSON")
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
