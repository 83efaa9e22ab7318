//! REST API module using Axum
//!
//! Provides HTTP endpoints for offshore weather-window planning:
//! - `/api/v1` with a consistent envelope: forecast, operation windows,
//!   environment feeds, settings, CSV/HTML exports
//! - `/health` probe at the root for load balancers

pub mod envelope;
pub mod handlers;
mod routes;

use axum::http::{header, Method};
use axum::response::Response;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use envelope::ApiErrorResponse;

/// Settings payloads are small; anything bigger than this is a client bug.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `OFFSHOREWATCH_CORS_ORIGINS` to a comma-separated list of allowed
/// origins for development (e.g., `http://localhost:5173` for a dev server).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("OFFSHOREWATCH_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => {
            // No cross-origin allowed by default
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

async fn not_found_fallback() -> Response {
    ApiErrorResponse::not_found("No such endpoint")
}

/// Create the complete application router.
pub fn create_app(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        // v1 API (primary)
        .nest("/api/v1", routes::api_routes(state.clone()))
        // Health probe at /health
        .merge(routes::legacy_routes(state))
        .fallback(not_found_fallback)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::Store;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn unmatched_path_returns_enveloped_404() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("db")).unwrap();
        let state = AppState::new(AppConfig::default(), store).unwrap();
        let app = create_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nonsense")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["error"]["code"], "NOT_FOUND");
    }
}
