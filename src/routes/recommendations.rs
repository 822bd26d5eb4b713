use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    request: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = request?;

    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        top_n = ?request.top_n,
        enrich = request.enrich,
        "Processing recommendation request"
    );

    let response = recommendations::get_recommendations(
        &state.similarity_table,
        state.metadata_provider.as_ref(),
        request,
    )
    .await?;

    Ok(Json(response))
}
