//! Assembly of the site backend's HTTP surface.
//!
//! The pages call `/api/v1/...` for catalog data, form submits and the
//! admin console; load balancers probe `/health`. [`build_app_router`] is
//! shared by `main.rs` and `tests/common/mod.rs` so the integration tests
//! run behind the same layers as production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request id, echoed back to the page.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the site [`Router`]: `/health`, the `/api/v1` tree and the
/// middleware around both.
///
/// Layers, outermost first:
///
/// 1. CORS for the site origins
/// 2. Request id assignment
/// 3. Request/response spans (the request id is already set here)
/// 4. Request id echoed on the response
/// 5. Overall request timeout
/// 6. Panic recovery
///
/// A page request usually fans out to several upstream calls, so the overall
/// timeout should be longer than `upstream_timeout_secs`; a warning is
/// logged when it isn't.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    if config.request_timeout_secs <= config.upstream_timeout_secs {
        tracing::warn!(
            request_timeout_secs = config.request_timeout_secs,
            upstream_timeout_secs = config.upstream_timeout_secs,
            "Request timeout does not exceed the upstream timeout; slow upstream calls will surface as 408",
        );
    }

    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Liveness probe, outside the versioned tree.
        .merge(routes::health::router())
        // Catalog, forms and admin console.
        .nest("/api/v1", routes::api_routes())
        // Innermost: a panicking handler becomes a 500.
        .layer(CatchPanicLayer::new())
        // Whole-request budget, upstream fan-out included.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // Outermost: preflights are answered before anything else runs.
        .layer(cors)
        .with_state(state)
}

/// CORS for the site origins.
///
/// Pages send the viewer's bearer token and JSON bodies, so only those two
/// request headers are allowed. The admin console needs PUT and DELETE;
/// nothing on the site issues PATCH.
///
/// Panics on an unparsable origin so a bad `CORS_ORIGINS` fails at startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
