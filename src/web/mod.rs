// Web server: Axum-based prediction endpoint.
//
// The artifacts are loaded before the router exists: `run_server` takes an
// already-built Predictor, so there is no way to serve requests against
// missing or mismatched artifacts. The predictor is shared read-only behind
// an Arc; handlers never lock.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::scoring::predictor::Predictor;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(predictor: Predictor, port: u16, bind: &str) -> Result<()> {
    let state = AppState {
        predictor: Arc::new(predictor),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("fakenews prediction API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: always returns 200 OK once the server is up.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
