use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{MemoryRecommendationRepository, RecommendationRepository},
    error::AppError,
    middleware::{make_span_with_request_id, request_id_middleware},
};

pub mod extract;
pub mod recommendations;

/// Shared application state
///
/// The repository handle is the only state carried across requests.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn RecommendationRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn RecommendationRepository>) -> Self {
        Self { repository }
    }

    /// State backed by a fresh process-local store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRecommendationRepository::new()))
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route(
            "/recommendations",
            get(recommendations::list).post(recommendations::create),
        )
        .route(
            "/recommendations/:id",
            get(recommendations::get)
                .put(recommendations::update)
                .delete(recommendations::delete),
        )
        .route("/recommendations/:id/like", put(recommendations::like))
        .route("/recommendations/:id/dislike", put(recommendations::dislike))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": 200, "message": "OK" })))
}

/// Landing response
async fn index() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "name": "Recommendation REST API Service",
            "version": env!("CARGO_PKG_VERSION"),
            "paths": {
                "recommendations": "/recommendations",
                "health": "/health"
            }
        })),
    )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("The requested URL {} was not found on the server.", uri.path()))
}
