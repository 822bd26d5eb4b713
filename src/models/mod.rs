use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One entry of a similarity lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredTitle {
    pub title: String,
    pub score: f64,
}

/// Metadata for a single film, fetched per request from the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmDetails {
    pub tmdb_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub genres: Vec<String>,
    pub trailer_url: Option<String>,
}

/// A recommended title with whatever metadata could be attached to it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedRecommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub title: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FilmDetails>,
    /// Set when metadata lookup failed for this title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Request for similar titles
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default = "default_enrich")]
    pub enrich: bool,
}

fn default_enrich() -> bool {
    true
}

/// Response for a recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResponse {
    pub query: String,
    /// False when the query title is not in the similarity table
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub recommendations: Vec<EnrichedRecommendation>,
}

/// Titles known to the similarity table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleListing {
    /// Number of matching titles before `limit` was applied
    pub total: usize,
    pub titles: Vec<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

/// Response from GET /movie/{id}/videos
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideosResponse {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl TmdbVideo {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube") && self.video_type == "Trailer"
    }
}

/// TMDB sends unreleased films as `""` or `null`; both become `None`
fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}
