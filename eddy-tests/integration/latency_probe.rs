//! Latency probing against real HTTP providers.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{EddyHarness, MockProvider, MockSite};

#[tokio::test]
async fn test_check_measures_reachable_provider() {
    let site = MockProvider::start(MockSite::items("x", 1).after(Duration::from_millis(50))).await;

    let eddy = EddyHarness::start(vec![site.provider("ffzy", "Alpha")]).await;
    let (status, body) = eddy.get_json("/api/check?key=ffzy").await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["providerKey"], "ffzy");
    let latency = body["latencyMs"].as_u64().unwrap();
    assert!((50..9999).contains(&latency), "latency {latency}");

    let query = &site.requests()[0];
    assert_eq!(query["ac"], "list");
    assert_eq!(query["pg"], "1");
    assert!(!query.contains_key("out"));
}

#[tokio::test]
async fn test_check_reports_sentinel_on_failure() {
    let hanging = MockProvider::start(MockSite::hanging()).await;
    let broken = MockProvider::start(MockSite::failing(StatusCode::BAD_GATEWAY)).await;

    let eddy = EddyHarness::start(vec![
        hanging.provider("hang", "Hang"),
        broken.provider("broken", "Broken"),
    ])
    .await;

    for key in ["hang", "broken", "unknown"] {
        let (status, body) = eddy.get_json(&format!("/api/check?key={key}")).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(body, json!({ "providerKey": key, "latencyMs": 9999 }));
    }
}
