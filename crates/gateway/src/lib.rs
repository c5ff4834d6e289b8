//! HTTP API for Parlance.
//!
//! Exposes health checks, scenario discovery, cache statistics and
//! curriculum generation over JSON.
//!
//! Built on Axum.

pub mod api;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use parlance_config::AppConfig;
use parlance_curriculum::CurriculumPipeline;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Response header naming where a curriculum came from.
pub const SOURCE_HEADER: &str = "x-curriculum-source";

/// Largest request body accepted.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub pipeline: CurriculumPipeline,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all routes and middleware.
///
/// Layers applied:
/// - Request body size limit (64 KiB)
/// - CORS from `gateway.allowed_origins` (`*` allows any origin)
/// - HTTP trace logging
pub fn build_router(state: SharedState, config: &AppConfig) -> Router {
    api::routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors_layer(&config.gateway.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(SOURCE_HEADER)])
        .max_age(std::time::Duration::from_secs(3600));

    if allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Start the gateway HTTP server.
///
/// The provider is built once from config; without a credential the server
/// still starts and serves fallback curricula.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = parlance_providers::build_from_config(&config);
    let pipeline = CurriculumPipeline::from_config(&config, provider);
    let state = Arc::new(GatewayState { pipeline });

    let app = build_router(state, &config);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
