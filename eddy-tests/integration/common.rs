//! Shared harness: HTTP mock providers and a running Eddy server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use eddy_core::{EddyConfig, FileRegistry, Provider};
use eddy_search::AggregationService;
use eddy_web::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const ADMIN_PASSWORD: &str = "test-password";

/// Scripted behaviour of one mock provider.
#[derive(Debug, Clone)]
pub struct MockSite {
    pub delay: Duration,
    pub status: StatusCode,
    pub body: Value,
}

impl MockSite {
    /// Answers with `count` items named `"<prefix> <n>"`.
    pub fn items(prefix: &str, count: usize) -> Self {
        let list: Vec<Value> = (0..count)
            .map(|n| json!({ "vod_id": n, "vod_name": format!("{prefix} {n}") }))
            .collect();
        Self::payload(json!({ "code": 1, "list": list }))
    }

    pub fn empty() -> Self {
        Self::items("none", 0)
    }

    pub fn payload(body: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            status: StatusCode::OK,
            body,
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            delay: Duration::ZERO,
            status,
            body: json!({ "msg": "upstream failure" }),
        }
    }

    /// Never answers within any configured timeout.
    pub fn hanging() -> Self {
        Self::items("late", 1).after(Duration::from_secs(30))
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct MockState {
    site: MockSite,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

/// A provider endpoint served by a real HTTP listener.
pub struct MockProvider {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockProvider {
    pub async fn start(site: MockSite) -> Self {
        let state = Arc::new(MockState {
            site,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api.php/provide/vod", get(provide))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/api.php/provide/vod", self.addr)
    }

    pub fn provider(&self, key: &str, name: &str) -> Provider {
        Provider::new(key, name, self.endpoint())
    }

    /// Query strings received so far, in arrival order.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn provide(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(params);
    if !state.site.delay.is_zero() {
        tokio::time::sleep(state.site.delay).await;
    }
    (state.site.status, Json(state.site.body.clone()))
}

/// A running Eddy server backed by a provider store in a temporary directory.
pub struct EddyHarness {
    addr: SocketAddr,
    pub client: reqwest::Client,
    pub data_file: PathBuf,
    _dir: tempfile::TempDir,
}

impl EddyHarness {
    pub async fn start(providers: Vec<Provider>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("db.json");
        std::fs::write(
            &data_file,
            serde_json::to_vec(&json!({ "sites": providers })).unwrap(),
        )
        .unwrap();

        let config = EddyConfig::for_testing();
        let registry = FileRegistry::open(data_file.clone(), false).await.unwrap();
        let service = AggregationService::with_http(&config.upstream, Arc::new(registry)).unwrap();
        let app = eddy_web::router(AppState::new(service, config.admin.clone()), dir.path());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(eddy_web::serve(listener, app));

        Self {
            addr,
            client: reqwest::Client::new(),
            data_file,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

/// Values of `field` across an item list, in order.
pub fn field_values(items: &Value, field: &str) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap_or_default().to_string())
        .collect()
}
