//! TMDB (The Movie Database) provider
//!
//! API Flow:
//! 1. Search: /search/movie?query= → TMDB movie ID of the first hit
//! 2. Details: /movie/{id} → overview, rating, release date, genres, poster path
//! 3. Videos: /movie/{id}/videos → first YouTube trailer
//!
//! The API key travels as the `api_key` query parameter on every call.

use crate::{
    error::{AppError, AppResult},
    models::{TmdbMovieDetails, TmdbSearchResponse, TmdbVideosResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        image_base_url: String,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{api_url}{path}` and decode the JSON body, failing on any non-2xx status
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movie(&self, title: &str) -> AppResult<Option<u64>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let search: TmdbSearchResponse = self
            .get_json("/search/movie", &[("query", title)])
            .await?;

        let best = search.results.first();
        let movie_id = best.map(|r| r.id);

        tracing::debug!(
            query = %title,
            results = search.results.len(),
            movie_id = ?movie_id,
            matched_title = ?best.and_then(|r| r.title.as_deref()),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(movie_id)
    }

    async fn fetch_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }

    async fn fetch_trailer(&self, movie_id: u64) -> AppResult<Option<String>> {
        let videos: TmdbVideosResponse = self
            .get_json(&format!("/movie/{}/videos", movie_id), &[])
            .await?;

        Ok(videos
            .results
            .iter()
            .find(|video| video.is_youtube_trailer())
            .map(|video| format!("{}{}", YOUTUBE_WATCH_URL, video.key)))
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url,
            poster_path.trim_start_matches('/')
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
