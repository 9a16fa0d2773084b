//! Administrative provider management through the API.

use eddy_core::{FileRegistry, ProviderRegistry, ProviderSet};
use serde_json::{Value, json};

use crate::common::{ADMIN_PASSWORD, EddyHarness, MockProvider, MockSite, field_values};

#[tokio::test]
async fn test_replace_sites_persists_and_takes_effect() {
    let old = MockProvider::start(MockSite::items("old", 1)).await;
    let new = MockProvider::start(MockSite::items("new", 2)).await;

    let eddy = EddyHarness::start(vec![old.provider("old", "Old")]).await;

    let response = eddy
        .client
        .post(eddy.url("/api/admin/sites"))
        .header("x-admin-password", ADMIN_PASSWORD)
        .json(&json!({ "sites": [
            { "key": "new", "name": "New", "api": new.endpoint() },
            { "key": "old", "name": "Old", "api": old.endpoint(), "active": false }
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "success": true }));

    let (_, body) = eddy.get_json("/api/search?wd=x").await;
    assert_eq!(field_values(&body["items"], "originProviderKey"), vec!["new", "new"]);
    assert!(old.requests().is_empty());

    let stored: Value = serde_json::from_slice(&std::fs::read(&eddy.data_file).unwrap()).unwrap();
    assert_eq!(stored["sites"][0]["key"], "new");
    assert_eq!(stored["sites"][1]["active"], false);
    assert!(stored["updated_at"].is_string());
}

#[tokio::test]
async fn test_replace_sites_rejects_bad_requests() {
    let site = MockProvider::start(MockSite::items("kept", 1)).await;
    let eddy = EddyHarness::start(vec![site.provider("kept", "Kept")]).await;

    let unauthorised = eddy
        .client
        .post(eddy.url("/api/admin/sites"))
        .header("x-admin-password", "wrong")
        .json(&json!({ "sites": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(unauthorised.status(), reqwest::StatusCode::FORBIDDEN);

    let duplicate = eddy
        .client
        .post(eddy.url("/api/admin/sites"))
        .header("x-admin-password", ADMIN_PASSWORD)
        .json(&json!({ "sites": [
            { "key": "dup", "name": "One", "api": "http://one.invalid/api" },
            { "key": "dup", "name": "Two", "api": "http://two.invalid/api" }
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), reqwest::StatusCode::BAD_REQUEST);

    let listed: Value = eddy
        .client
        .get(eddy.url("/api/admin/sites"))
        .header("x-admin-password", ADMIN_PASSWORD)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(field_values(&listed, "key"), vec!["kept"]);
}

#[tokio::test]
async fn test_login_checks_password() {
    let eddy = EddyHarness::start(Vec::new()).await;

    for (password, expected) in [
        (ADMIN_PASSWORD, reqwest::StatusCode::OK),
        ("guess", reqwest::StatusCode::FORBIDDEN),
        ("", reqwest::StatusCode::FORBIDDEN),
    ] {
        let response = eddy
            .client
            .post(eddy.url("/api/admin/login"))
            .json(&json!({ "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_running_server_picks_up_store_rewritten_elsewhere() {
    let old = MockProvider::start(MockSite::items("old", 1)).await;
    let imported = MockProvider::start(MockSite::items("imported", 1)).await;

    let eddy = EddyHarness::start(vec![old.provider("old", "Old")]).await;
    let (_, before) = eddy.get_json("/api/search?wd=x").await;
    assert_eq!(field_values(&before["items"], "originProviderKey"), vec!["old"]);

    // Same path a separate `eddy sites import` process would write to
    let importer = FileRegistry::open(eddy.data_file.clone(), false).await.unwrap();
    importer
        .replace_all(ProviderSet::new(vec![imported.provider("imported", "Imported")]).unwrap())
        .await
        .unwrap();

    let (_, after) = eddy.get_json("/api/search?wd=x").await;
    assert_eq!(field_values(&after["items"], "originProviderKey"), vec!["imported"]);
    assert_eq!(old.requests().len(), 1);
}
