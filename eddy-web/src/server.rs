//! JSON API server for Eddy
//!
//! Serves the client query operations under `/api`, the administrative
//! provider management endpoints under `/api/admin`, and static assets for
//! everything else.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use eddy_core::config::AdminConfig;
use eddy_core::{EddyConfig, EddyError, FileRegistry};
use eddy_search::AggregationService;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers::{
    admin_list_sites, admin_login, admin_replace_sites, api_check, api_detail, api_hot, api_search,
};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: AggregationService,
    pub admin: Arc<AdminConfig>,
}

impl AppState {
    pub fn new(service: AggregationService, admin: AdminConfig) -> Self {
        Self {
            service,
            admin: Arc::new(admin),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        // Client query endpoints
        .route("/api/check", get(api_check))
        .route("/api/hot", get(api_hot))
        .route("/api/search", get(api_search))
        .route("/api/detail", get(api_detail))
        // Administrative endpoints
        .route("/api/admin/login", post(admin_login))
        .route(
            "/api/admin/sites",
            get(admin_list_sites).post(admin_replace_sites),
        )
        // Static assets
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serves `app` on an already bound listener until the process stops.
///
/// # Errors
/// - `EddyError::Io` - Accepting connections failed
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), EddyError> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Opens the provider registry, builds the aggregation service and serves the
/// API on the configured address.
///
/// # Errors
/// - `EddyError::Registry` - Provider store could not be opened or created
/// - `EddyError::Server` - HTTP client could not be initialised
/// - `EddyError::Io` - Listener could not be bound
pub async fn run_server(config: EddyConfig) -> Result<(), EddyError> {
    let registry = FileRegistry::open(
        config.registry.data_file.clone(),
        config.registry.merge_defaults,
    )
    .await?;
    let service = AggregationService::with_http(&config.upstream, Arc::new(registry))
        .map_err(EddyError::from_server_error)?;

    if config.admin.password.is_none() {
        warn!("No admin password configured; administrative endpoints are disabled");
    }

    let state = AppState::new(service, config.admin.clone());
    let app = router(state, &config.server.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        static_dir = %config.server.static_dir.display(),
        "Eddy server running on http://{addr}"
    );

    serve(listener, app).await
}
