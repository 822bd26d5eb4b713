use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::TitleListing,
    routes::AppState,
    services::title_search::{self, DEFAULT_LISTING_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct FilmsQuery {
    q: Option<String>,
    limit: Option<usize>,
}

/// Handler for the film catalogue endpoint
pub async fn list(
    State(state): State<Arc<AppState>>,
    params: Result<Query<FilmsQuery>, QueryRejection>,
) -> AppResult<Json<TitleListing>> {
    let Query(params) = params?;

    Ok(Json(title_search::list_titles(
        &state.similarity_table,
        params.q.as_deref(),
        params.limit.unwrap_or(DEFAULT_LISTING_LIMIT),
    )))
}
