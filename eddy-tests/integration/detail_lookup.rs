//! Single-provider detail lookups.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{EddyHarness, MockProvider, MockSite};

#[tokio::test]
async fn test_detail_passes_payload_through() {
    let payload = json!({
        "code": 1,
        "list": [{ "vod_id": 42, "vod_name": "Example", "vod_play_url": "ep1$http://x/1.m3u8" }]
    });
    let site = MockProvider::start(MockSite::payload(payload.clone())).await;

    let eddy = EddyHarness::start(vec![site.provider("ffzy", "Alpha")]).await;
    let (status, body) = eddy.get_json("/api/detail?site_key=ffzy&id=42").await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body, payload);

    let query = &site.requests()[0];
    assert_eq!(query["ac"], "detail");
    assert_eq!(query["ids"], "42");
    assert_eq!(query["out"], "json");
}

#[tokio::test]
async fn test_detail_reaches_inactive_provider() {
    let site = MockProvider::start(MockSite::items("item", 1)).await;

    let eddy = EddyHarness::start(vec![site.provider("off", "Off").with_active(false)]).await;
    let (status, _) = eddy.get_json("/api/detail?site_key=off&id=0").await;

    assert_eq!(status, reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_detail_unknown_provider_is_not_found() {
    let eddy = EddyHarness::start(Vec::new()).await;

    let (status, body) = eddy.get_json("/api/detail?site_key=ghost&id=1").await;

    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_detail_upstream_failures_are_bad_gateway() {
    let broken = MockProvider::start(MockSite::failing(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let hanging = MockProvider::start(MockSite::hanging()).await;

    let eddy = EddyHarness::start(vec![
        broken.provider("broken", "Broken"),
        hanging.provider("hang", "Hang"),
    ])
    .await;

    let (status, body) = eddy.get_json("/api/detail?site_key=broken&id=1").await;
    assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());

    let (status, _) = eddy.get_json("/api/detail?site_key=hang&id=1").await;
    assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
}
