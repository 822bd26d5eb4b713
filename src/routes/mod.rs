use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::SimilarityTable,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::MetadataProvider,
};

pub mod films;
pub mod recommendations;

/// Shared, read-only application state
pub struct AppState {
    /// Loaded once at startup and never mutated
    pub similarity_table: Arc<SimilarityTable>,
    pub metadata_provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(
        similarity_table: Arc<SimilarityTable>,
        metadata_provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            similarity_table,
            metadata_provider,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/films", get(films::list))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
