//! HTTP API gateway for Consilium.
//!
//! Exposes the question-answering pipeline over two POST endpoints plus a
//! health check:
//!
//! - `POST /extract-info`: classify, retrieve and answer (Romanian or English)
//! - `POST /extract-timpark-info`: answer over the TimPark parking dataset
//! - `GET /health`
//!
//! Built on Axum.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use consilium_config::AppConfig;
use consilium_core::error::Error;
use consilium_core::provider::Provider;
use consilium_pipeline::Pipeline;

/// Shared application state for the gateway. Immutable after startup.
pub struct GatewayState {
    pub pipeline: Arc<Pipeline>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS limited to the configured origins
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(api::health_handler))
        .route("/extract-info", post(api::extract_info_handler))
        .route("/extract-timpark-info", post(api::extract_timpark_info_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors_layer(cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build the model provider the gateway serves with.
///
/// Fails when no API key is configured for the default provider.
pub fn provider_for(config: &AppConfig) -> Result<Arc<dyn Provider>, Error> {
    if !config.has_api_key() {
        return Err(Error::Config {
            message: format!(
                "no API key for provider '{}', set CONSILIUM_API_KEY or OPENAI_API_KEY",
                config.default_provider
            ),
        });
    }
    Ok(consilium_providers::default_from_config(config))
}

/// Start the gateway HTTP server.
///
/// The provider and pipeline are built once and shared by every request.
/// Refuses to start without an API key.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let provider = provider_for(&config)?;

    let pipeline = Arc::new(Pipeline::from_config(provider, &config));
    let state = Arc::new(GatewayState { pipeline });
    let app = build_router(state, &config.gateway.cors_origins);

    info!(
        addr = %addr,
        model = %config.default_model,
        data_dir = %config.datasets.data_dir.display(),
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
