//! Film metadata provider abstraction
//!
//! Enrichment needs three calls against the provider: a title search to discover the
//! provider's ID, a detail fetch, and a trailer lookup. Each call is a single HTTP
//! request with no retries.

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{FilmDetails, TmdbMovieDetails},
};

pub mod tmdb;

/// Trait for film metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search by title and return the ID of the best match, if any
    async fn search_movie(&self, title: &str) -> AppResult<Option<u64>>;

    /// Fetch full details by provider ID
    async fn fetch_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails>;

    /// Fetch the trailer URL for a provider ID, if one exists
    async fn fetch_trailer(&self, movie_id: u64) -> AppResult<Option<String>>;

    /// Build a poster URL from the provider's relative image path
    fn poster_url(&self, poster_path: &str) -> String;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Resolve a title to its full metadata
///
/// Returns `Ok(None)` when the search finds nothing. Any failing call abandons the
/// lookup for this title.
#[instrument(skip(provider), fields(source = provider.name()))]
pub async fn fetch_film_details(
    provider: &dyn MetadataProvider,
    title: &str,
) -> AppResult<Option<FilmDetails>> {
    let Some(movie_id) = provider.search_movie(title).await? else {
        tracing::debug!("No metadata match");
        return Ok(None);
    };

    let details = provider.fetch_details(movie_id).await?;
    let trailer_url = provider.fetch_trailer(movie_id).await?;

    Ok(Some(FilmDetails {
        tmdb_id: details.id,
        title: details.title,
        poster_url: details
            .poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| provider.poster_url(path)),
        overview: details.overview.filter(|o| !o.trim().is_empty()),
        rating: details.vote_average,
        release_date: details.release_date,
        genres: details.genres.into_iter().map(|g| g.name).collect(),
        trailer_url,
    }))
}
