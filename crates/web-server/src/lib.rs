use analytics::LongevityEngine;
use api_client::SnapshotFetcher;
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use configuration::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    /// `None` when no API key is configured; scoring requests then fail with 500.
    pub fetcher: Option<Arc<SnapshotFetcher>>,
    pub engine: LongevityEngine,
}

impl AppState {
    pub fn new(fetcher: Option<Arc<SnapshotFetcher>>) -> Self {
        Self {
            fetcher,
            engine: LongevityEngine::new(),
        }
    }

    /// Builds the state from the loaded settings. A missing API key is logged
    /// but does not stop the server from starting.
    pub fn from_settings(settings: &Settings) -> Self {
        let fetcher = match SnapshotFetcher::from_config(&settings.api) {
            Ok(fetcher) => Some(Arc::new(fetcher)),
            Err(e) => {
                tracing::warn!(error = %e, "Market-data client unavailable; scoring requests will fail.");
                None
            }
        };
        Self::new(fetcher)
    }
}

/// Wires the routes, CORS and request tracing around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/calculate-longevity", post(handlers::calculate_longevity))
        .route("/calculate-longevity", post(handlers::calculate_longevity))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
/// Tracing is expected to be initialized by the caller.
pub async fn run_server(addr: SocketAddr, settings: &Settings) -> anyhow::Result<()> {
    let app_state = Arc::new(AppState::from_settings(settings));
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
