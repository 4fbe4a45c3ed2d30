//! REST API endpoints.
//!
//! Axum-based HTTP API exposing the lineup analyzers and the metadata
//! needed to drive them (teams, seasons, players).

pub mod routes;
pub mod state;

use axum::routing::get;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/meta/teams", get(routes::meta::teams))
        .route("/api/meta/seasons", get(routes::meta::seasons))
        .route("/api/meta/players", get(routes::meta::players))
        .route(
            "/api/analysis/co-starters",
            get(routes::analysis::co_starters),
        )
        .route(
            "/api/analysis/anticorrelated",
            get(routes::analysis::anticorrelated),
        )
        .route(
            "/api/analysis/formations",
            get(routes::analysis::formations),
        )
        .route("/api/analysis/rules", get(routes::analysis::rules))
        .route("/api/analysis/player", get(routes::analysis::player))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
