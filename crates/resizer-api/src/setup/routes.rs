//! Route configuration and setup

use crate::constants::{DOWNLOAD_PATH, ESTIMATE_PATH, HEALTH_PATH, PREVIEW_PATH, UPLOAD_PATH};
use crate::handlers;
use crate::middleware::{error_body_middleware, ErrorBodyConfig};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use resizer_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Multipart framing and the text fields on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut routes = Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(UPLOAD_PATH, post(handlers::upload::upload_image))
        .route(
            &format!("{}/{{filename}}", PREVIEW_PATH),
            get(handlers::preview::preview_image),
        )
        .route(
            &format!("{}/{{filename}}", DOWNLOAD_PATH),
            get(handlers::download::download_image),
        );

    if config.estimate_enabled {
        routes = routes.route(ESTIMATE_PATH, post(handlers::estimate::estimate_size));
    }

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        estimate_enabled = config.estimate_enabled,
        "Routes configured"
    );

    let error_body_config = Arc::new(ErrorBodyConfig::new(
        config.is_production(),
        config.max_file_size_bytes,
    ));

    let app = routes
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(
            config.max_file_size_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(axum::middleware::from_fn_with_state(
            error_body_config,
            error_body_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
