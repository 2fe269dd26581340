//! Client for the current v2 JW Platform API.
//!
//! Version 2 authenticates with a bearer token (the property's API secret)
//! and reports failures with an HTTP status of 400 or above and a JSON body
//! of the form `{"errors": [{"code": .., "description": ..}]}`, which is
//! surfaced as [`crate::ApiError`].
//!
//! [`V2Client`] is the transport. The resource clients in this module wrap it
//! with typed request and response bodies.

pub mod channels;
pub mod client;
pub mod media;
pub mod players;
pub mod types;
pub mod uploads;
pub mod webhooks;

pub use channels::ChannelsClient;
pub use client::V2Client;
pub use media::MediaClient;
pub use players::PlayersClient;
pub use types::{QueryParams, ResourceResponse, ResourcesResponse};
pub use uploads::UploadsClient;
pub use webhooks::WebhooksClient;
