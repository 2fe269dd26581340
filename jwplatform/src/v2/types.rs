//! Envelope types shared by all v2 resources.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Fields every singular v2 resource carries.
///
/// Resource types embed this with `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceResponse {
    pub id: String,
    /// When the resource was created.
    pub created: Option<Timestamp>,
    /// When the resource was last changed.
    pub last_modified: Option<Timestamp>,
    /// The API's name for the resource type, e.g. `media`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Links to related resources, keyed by relationship name.
    pub relationships: serde_json::Map<String, serde_json::Value>,
}

/// Paging details included in every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesResponse {
    /// Total number of resources matching the request.
    pub total: u64,
    pub page: u32,
    pub page_length: u32,
}

/// Parameters accepted by every list endpoint.
///
/// Zero or empty fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Page number, starting at 1.
    pub page: u32,
    /// Number of resources per page.
    pub page_length: u32,
    /// Search / filter expression, e.g. `title:"Big Buck Bunny"`.
    pub query: String,
    /// Sort order, e.g. `created:dsc`.
    pub sort: String,
}

impl QueryParams {
    /// The non-empty parameters as `(name, value)` pairs, sorted by name.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page != 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.page_length != 0 {
            pairs.push(("page_length", self.page_length.to_string()));
        }
        if !self.query.is_empty() {
            pairs.push(("q", self.query.clone()));
        }
        if !self.sort.is_empty() {
            pairs.push(("sort", self.sort.clone()));
        }
        pairs
    }

    /// The parameters as a URL query string.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}
