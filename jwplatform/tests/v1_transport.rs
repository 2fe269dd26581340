mod common;

use common::{MockServer, closed_port_url, init_tracing};
use http::Method;
use jwplatform::v1::{Client, Clock, NonceSource, Params};
use jwplatform::{ClientConfig, FailureKind};
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug)]
struct FixedNonce;

impl NonceSource for FixedNonce {
    fn nonce(&self) -> String {
        "12345678".to_string()
    }
}

#[derive(Debug)]
struct FixedClock;

impl Clock for FixedClock {
    fn unix_seconds(&self) -> i64 {
        1_700_000_000
    }
}

#[derive(Debug, Deserialize)]
struct VideoShow {
    status: String,
    #[serde(default)]
    video: Option<Video>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
}

fn client_for(server: &MockServer) -> Client {
    init_tracing();
    Client::with_config("API_KEY", "API_SECRET", &server.config())
        .unwrap()
        .with_nonce_source(FixedNonce)
        .with_clock(FixedClock)
}

fn video_params() -> Params {
    let mut params = Params::new();
    params.set("video_key", "VIDEO_KEY");
    params
}

#[tokio::test]
async fn signed_request_is_sent_and_decoded() {
    let server = MockServer::start().await;
    server.route(
        Method::GET,
        "/v1/videos/show",
        200,
        r#"{"status":"ok","video":{"key":"VIDEO_KEY"}}"#,
    );
    let client = client_for(&server);

    let shown: VideoShow = client
        .make_request(Method::GET, "/videos/show", Some(video_params()))
        .await
        .unwrap();
    assert_eq!(shown.status, "ok");
    assert_eq!(shown.video.unwrap().key, "VIDEO_KEY");

    let request = server.single_request();
    assert_eq!(request.header("accept"), Some("application/json"));
    assert!(
        request
            .header("user-agent")
            .is_some_and(|ua| ua.starts_with("jwplatform-rs/"))
    );

    let query = Params::parse(request.query.as_deref().unwrap_or_default());
    assert_eq!(query.len(), 6);
    assert_eq!(query.get("video_key"), Some("VIDEO_KEY"));
    assert_eq!(query.get("api_key"), Some("API_KEY"));
    assert_eq!(query.get("api_format"), Some("json"));
    assert_eq!(query.get("api_nonce"), Some("12345678"));
    assert_eq!(query.get("api_timestamp"), Some("1700000000"));
    assert_eq!(
        query.get("api_signature"),
        Some("8647dbc18f2b10c39c0eabb3a4c536849bc0c3cd")
    );
    assert!(!request.query.unwrap_or_default().contains("API_SECRET"));
}

#[tokio::test]
async fn body_is_decoded_whatever_the_status() {
    let server = MockServer::start().await;
    server.route(
        Method::GET,
        "/v1/videos/show",
        404,
        r#"{"status":"error","code":"NotFound","message":"Video not found"}"#,
    );
    let client = client_for(&server);

    let shown: VideoShow = client
        .make_request(Method::GET, "/videos/show", Some(video_params()))
        .await
        .unwrap();
    assert_eq!(shown.status, "error");
    assert_eq!(shown.message.as_deref(), Some("Video not found"));
}

#[tokio::test]
async fn each_call_is_signed_afresh() {
    let server = MockServer::start().await;
    server.route(Method::GET, "/v1/accounts/show", 200, r#"{"status":"ok"}"#);
    init_tracing();
    let client = Client::with_config("API_KEY", "API_SECRET", &server.config()).unwrap();

    for _ in 0..2 {
        let _: serde_json::Value = client
            .make_request(Method::GET, "/accounts/show", None)
            .await
            .unwrap();
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    let signed: Vec<Params> = requests
        .iter()
        .map(|r| Params::parse(r.query.as_deref().unwrap_or_default()))
        .collect();
    for query in &signed {
        let nonce = query.get("api_nonce").unwrap();
        assert_eq!(nonce.len(), 8);
        assert!(nonce.bytes().all(|b| b.is_ascii_digit()), "{nonce}");
    }
    assert_ne!(signed[0].get("api_nonce"), signed[1].get("api_nonce"));
    assert_ne!(
        signed[0].get("api_signature"),
        signed[1].get("api_signature")
    );
}

#[tokio::test]
async fn non_json_body_is_an_encoding_failure() {
    let server = MockServer::start().await;
    server.route(Method::GET, "/v1/videos/show", 502, "Bad Gateway");
    let client = client_for(&server);

    let err = client
        .make_request::<VideoShow>(Method::GET, "/videos/show", Some(video_params()))
        .await
        .unwrap_err();
    assert_eq!(FailureKind::of(&err), FailureKind::Encoding);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_failure() {
    init_tracing();
    let config = ClientConfig::default().with_v1_base_url(closed_port_url().await);
    let client = Client::with_config("API_KEY", "API_SECRET", &config).unwrap();

    let err = client
        .make_request::<serde_json::Value>(Method::GET, "/videos/show", None)
        .await
        .unwrap_err();
    assert_eq!(FailureKind::of(&err), FailureKind::Transport);
}
