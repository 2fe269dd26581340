//! Structured v2 API errors and classification of library failures.
//!
//! Every fallible operation in this crate returns an [`eyre::Report`]. When the
//! v2 API rejects a request (status 400 or above) the report wraps an
//! [`ApiError`] that can be recovered with [`eyre::Report::downcast_ref`]:
//!
//! ```rust,no_run
//! # async fn example(platform: jwplatform::JwPlatform) {
//! use jwplatform::ApiError;
//!
//! match platform.media.get("site", "media").await {
//!     Ok(media) => println!("{}", media.metadata.title),
//!     Err(e) => match e.downcast_ref::<ApiError>() {
//!         Some(api) if api.status_code == 404 => println!("no such media"),
//!         Some(api) => println!("rejected: {}", api.errors[0].code),
//!         None => println!("request failed: {e:#}"),
//!     },
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single error reported by the v2 API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorEntry {
    /// Machine-readable error code, e.g. `not_found` or `invalid_body`.
    pub code: String,
    /// Human-readable explanation.
    pub description: String,
}

/// Error payload of a v2 API response with status 400 or above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ApiErrorEntry>,
    /// HTTP status of the response. Not part of the response body.
    #[serde(default, rename(serialize = "StatusCode"))]
    pub status_code: u16,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ApiErrorEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ApiErrorEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ApiError {
    /// Decodes an error response body and tags it with `status_code`.
    ///
    /// An empty body produces an error with no entries.
    pub(crate) fn from_response(status_code: u16, body: &[u8]) -> serde_json::Result<Self> {
        let mut error = if body.iter().all(u8::is_ascii_whitespace) {
            Self::default()
        } else {
            serde_json::from_slice::<Self>(body)?
        };
        error.status_code = status_code;
        Ok(error)
    }

    /// The first reported error, if any.
    pub fn first(&self) -> Option<&ApiErrorEntry> {
        self.errors.first()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(e) => write!(f, "Unknown error when parsing JSON response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Broad category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never completed: DNS, connect, TLS, timeout, or a broken body stream.
    Transport,
    /// JSON could not be produced from a request body or read from a response.
    Encoding,
    /// The v2 API answered with a structured [`ApiError`].
    Api,
    /// Anything else, such as invalid configuration or a local file error.
    Other,
}

impl FailureKind {
    /// Classifies an error returned by this crate.
    pub fn of(report: &eyre::Report) -> Self {
        if report.downcast_ref::<ApiError>().is_some() {
            return Self::Api;
        }
        if let Some(e) = report.downcast_ref::<reqwest::Error>() {
            return if e.is_builder() {
                Self::Other
            } else {
                Self::Transport
            };
        }
        if report.downcast_ref::<serde_json::Error>().is_some() {
            return Self::Encoding;
        }
        Self::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_error_payload() {
        let body = br#"{"errors":[{"code":"invalid_body","description":"name was too long"}]}"#;
        let error = ApiError::from_response(400, body).unwrap();
        assert_eq!(error.status_code, 400);
        assert_eq!(
            error.first(),
            Some(&ApiErrorEntry {
                code: "invalid_body".into(),
                description: "name was too long".into(),
            })
        );
        assert!(error.has_code("invalid_body"));
        assert!(!error.has_code("not_found"));
    }

    #[test]
    fn empty_body_yields_error_without_entries() {
        let error = ApiError::from_response(502, b"").unwrap();
        assert_eq!(error.status_code, 502);
        assert!(error.errors.is_empty());
    }

    #[test]
    fn partial_entries_and_null_list_still_decode() {
        let error = ApiError::from_response(401, br#"{"errors":[{"code":"unauthorized"}]}"#).unwrap();
        assert_eq!(error.status_code, 401);
        assert_eq!(
            error.errors,
            vec![ApiErrorEntry {
                code: "unauthorized".into(),
                description: String::new(),
            }]
        );

        let error = ApiError::from_response(403, br#"{"errors":null}"#).unwrap();
        assert_eq!(error.status_code, 403);
        assert!(error.errors.is_empty());
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        assert!(ApiError::from_response(500, b"<html>oops</html>").is_err());
    }

    #[test]
    fn display_is_json() {
        let error = ApiError {
            errors: vec![ApiErrorEntry {
                code: "not_found".into(),
                description: "The requested resource could not be found.".into(),
            }],
            status_code: 404,
        };
        assert_snapshot!(error, @r#"{"errors":[{"code":"not_found","description":"The requested resource could not be found."}],"StatusCode":404}"#);
    }

    #[test]
    fn classifies_reports() {
        let api: eyre::Report = ApiError::default().into();
        assert_eq!(FailureKind::of(&api), FailureKind::Api);

        let decode = serde_json::from_str::<u32>("nope").unwrap_err();
        let decode = Err::<(), _>(decode).context("parse response").unwrap_err();
        assert_eq!(FailureKind::of(&decode), FailureKind::Encoding);

        let other = eyre::eyre!("something else");
        assert_eq!(FailureKind::of(&other), FailureKind::Other);
    }
}
