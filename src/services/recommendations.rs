use crate::{
    db::SimilarityTable,
    error::{AppError, AppResult},
    models::{EnrichedRecommendation, RecommendationRequest, RecommendationResponse},
    services::providers::{fetch_film_details, MetadataProvider},
};

pub const DEFAULT_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 10;
pub const NOT_FOUND_MESSAGE: &str = "Film not found in the database.";

/// Recommends titles similar to the requested one
///
/// Looks the title up in the similarity table, then (unless disabled) attaches
/// metadata to each result. A title missing from the table yields a response with
/// `found = false` rather than an error. Metadata failures are isolated per item:
/// the failing item carries a warning and the rest are still enriched.
pub async fn get_recommendations(
    table: &SimilarityTable,
    provider: &dyn MetadataProvider,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }

    let top_n = request.top_n.unwrap_or(DEFAULT_TOP_N);
    if top_n > MAX_TOP_N {
        return Err(AppError::InvalidInput(format!(
            "top_n must be at most {}",
            MAX_TOP_N
        )));
    }

    let Some(similar) = table.top_n(title, top_n) else {
        tracing::info!(query = %title, "Film not found in similarity table");
        return Ok(RecommendationResponse {
            query: title.to_string(),
            found: false,
            message: Some(NOT_FOUND_MESSAGE.to_string()),
            recommendations: Vec::new(),
        });
    };

    let mut recommendations = Vec::with_capacity(similar.len());
    let mut failures = 0;

    for (index, scored) in similar.into_iter().enumerate() {
        let mut item = EnrichedRecommendation {
            rank: index + 1,
            title: scored.title,
            score: scored.score,
            details: None,
            warning: None,
        };

        if request.enrich {
            match fetch_film_details(provider, &item.title).await {
                Ok(details) => item.details = details,
                Err(e) => {
                    tracing::warn!(
                        title = %item.title,
                        error = %e,
                        provider = provider.name(),
                        "Metadata lookup failed"
                    );
                    failures += 1;
                    item.warning = Some(e.to_string());
                }
            }
        }

        recommendations.push(item);
    }

    tracing::info!(
        query = %title,
        top_n = top_n,
        results = recommendations.len(),
        enriched = request.enrich,
        failures = failures,
        "Recommendations generated"
    );

    Ok(RecommendationResponse {
        query: title.to_string(),
        found: true,
        message: None,
        recommendations,
    })
}
