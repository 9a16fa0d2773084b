//! Concurrent search across real HTTP providers.

use std::time::{Duration, Instant};

use axum::http::StatusCode;

use crate::common::{EddyHarness, MockProvider, MockSite, field_values};

#[tokio::test]
async fn test_search_merges_in_registry_order_despite_arrival_order() {
    let slow = MockProvider::start(MockSite::items("slow", 2).after(Duration::from_millis(300))).await;
    let fast = MockProvider::start(MockSite::items("fast", 3)).await;

    let eddy = EddyHarness::start(vec![slow.provider("a", "Slow"), fast.provider("b", "Fast")]).await;
    let (status, body) = eddy.get_json("/api/search?wd=matrix").await;

    assert_eq!(status, reqwest::StatusCode::OK);
    let items = &body["items"];
    assert_eq!(
        field_values(items, "originProviderKey"),
        vec!["a", "a", "b", "b", "b"]
    );
    assert_eq!(
        field_values(items, "vod_name"),
        vec!["slow 0", "slow 1", "fast 0", "fast 1", "fast 2"]
    );
    assert_eq!(items[0]["originProviderName"], "Slow");
    assert_eq!(items[0]["latency"], 9999);
}

#[tokio::test]
async fn test_search_providers_run_concurrently() {
    let a = MockProvider::start(MockSite::items("a", 1).after(Duration::from_millis(250))).await;
    let b = MockProvider::start(MockSite::items("b", 1).after(Duration::from_millis(300))).await;
    let c = MockProvider::start(MockSite::items("c", 1).after(Duration::from_millis(350))).await;

    let eddy = EddyHarness::start(vec![
        a.provider("a", "A"),
        b.provider("b", "B"),
        c.provider("c", "C"),
    ])
    .await;

    let started = Instant::now();
    let (_, body) = eddy.get_json("/api/search?wd=x").await;
    let elapsed = started.elapsed();

    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    // Sequential calls would need at least 900ms
    assert!(elapsed < Duration::from_millis(800), "took {elapsed:?}");
}

#[tokio::test]
async fn test_search_drops_slow_and_failing_providers() {
    let good = MockProvider::start(MockSite::items("good", 2)).await;
    let hanging = MockProvider::start(MockSite::hanging()).await;
    let broken = MockProvider::start(MockSite::failing(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let garbage = MockProvider::start(MockSite::payload(serde_json::json!({ "msg": "no list" }))).await;

    let eddy = EddyHarness::start(vec![
        hanging.provider("hang", "Hang"),
        good.provider("good", "Good"),
        broken.provider("broken", "Broken"),
        garbage.provider("garbage", "Garbage"),
    ])
    .await;

    let started = Instant::now();
    let (status, body) = eddy.get_json("/api/search?wd=x").await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(field_values(&body["items"], "originProviderKey"), vec!["good", "good"]);
    // Bounded by the 600ms test search timeout, not the 30s hang
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_search_skips_inactive_and_blank_queries() {
    let active = MockProvider::start(MockSite::items("on", 1)).await;
    let inactive = MockProvider::start(MockSite::items("off", 1)).await;

    let eddy = EddyHarness::start(vec![
        active.provider("on", "On"),
        inactive.provider("off", "Off").with_active(false),
    ])
    .await;

    let (_, blank) = eddy.get_json("/api/search?wd=%20%20").await;
    assert_eq!(blank, serde_json::json!({ "items": [] }));
    assert!(active.requests().is_empty());

    let (_, body) = eddy.get_json("/api/search?wd=star%20wars").await;
    assert_eq!(field_values(&body["items"], "originProviderKey"), vec!["on"]);
    assert!(inactive.requests().is_empty());

    let requests = active.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["ac"], "list");
    assert_eq!(requests[0]["wd"], "star wars");
    assert_eq!(requests[0]["out"], "json");
}
