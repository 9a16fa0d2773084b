//! Sequential hot-list selection across real HTTP providers.

use std::time::Duration;

use axum::http::StatusCode;

use crate::common::{EddyHarness, MockProvider, MockSite, field_values};

#[tokio::test]
async fn test_hot_falls_through_to_first_provider_with_items() {
    let ffzy = MockProvider::start(MockSite::empty()).await;
    let bfzy = MockProvider::start(MockSite::items("recent", 20)).await;
    let lzi = MockProvider::start(MockSite::items("never", 5)).await;

    let eddy = EddyHarness::start(vec![
        ffzy.provider("ffzy", "First"),
        bfzy.provider("bfzy", "Second"),
        lzi.provider("lzi", "Third"),
    ])
    .await;

    let (status, body) = eddy.get_json("/api/hot").await;

    assert_eq!(status, reqwest::StatusCode::OK);
    let names = field_values(&body["items"], "vod_name");
    assert_eq!(names.len(), 12);
    assert_eq!(names[0], "recent 0");
    assert_eq!(names[11], "recent 11");
    assert_eq!(body["items"][0]["originProviderKey"], "bfzy");

    assert_eq!(ffzy.requests().len(), 1);
    assert_eq!(bfzy.requests().len(), 1);
    assert!(lzi.requests().is_empty());

    let query = &bfzy.requests()[0];
    assert_eq!(query["ac"], "list");
    assert_eq!(query["pg"], "1");
    assert_eq!(query["h"], "24");
}

#[tokio::test]
async fn test_hot_skips_timeouts_and_non_candidates() {
    let ffzy = MockProvider::start(MockSite::hanging()).await;
    let other = MockProvider::start(MockSite::items("other", 3)).await;
    let dbzy = MockProvider::start(MockSite::items("last", 2).after(Duration::from_millis(20))).await;

    let eddy = EddyHarness::start(vec![
        other.provider("other", "Not Preferred"),
        ffzy.provider("ffzy", "Hangs"),
        dbzy.provider("dbzy", "Last"),
    ])
    .await;

    let (_, body) = eddy.get_json("/api/hot").await;

    assert_eq!(field_values(&body["items"], "vod_name"), vec!["last 0", "last 1"]);
    assert!(other.requests().is_empty());
}

#[tokio::test]
async fn test_hot_is_empty_when_all_candidates_fail() {
    let ffzy = MockProvider::start(MockSite::failing(StatusCode::SERVICE_UNAVAILABLE)).await;
    let bfzy = MockProvider::start(MockSite::empty()).await;

    let eddy = EddyHarness::start(vec![ffzy.provider("ffzy", "A"), bfzy.provider("bfzy", "B")]).await;

    let (status, body) = eddy.get_json("/api/hot").await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "items": [] }));
}
