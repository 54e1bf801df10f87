use axum::{Router, routing::get};
use configuration::Config;
use engine::DashboardEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub engine: DashboardEngine,
}

impl AppState {
    pub fn new(engine: DashboardEngine) -> Arc<Self> {
        Arc::new(Self { engine })
    }
}

/// Builds the router with CORS and request tracing applied.
pub fn app_router(state: Arc<AppState>) -> Router {
    // The dashboard frontend may be served from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/performance_charts", get(handlers::performance_charts))
        .route("/api/fmp_articles", get(handlers::fmp_articles))
        .route("/api/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(addr: SocketAddr, config: Config) -> anyhow::Result<()> {
    let engine = DashboardEngine::new(config)?;
    let app = app_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// The address from the `[server]` section.
pub fn server_addr(config: &Config) -> anyhow::Result<SocketAddr> {
    let addr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    Ok(addr)
}
