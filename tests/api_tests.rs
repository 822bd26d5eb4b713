use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use film_recommender::{
    create_router,
    db::SimilarityTable,
    models::TmdbMovieDetails,
    services::MetadataProvider,
    AppError, AppResult, AppState,
};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Metadata provider that answers from fixed data; "Ronin" always fails upstream
struct StubProvider;

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn search_movie(&self, title: &str) -> AppResult<Option<u64>> {
        Ok(match title {
            "Heat" => Some(949),
            "Ronin" => Some(8195),
            "Thief" => Some(11524),
            _ => None,
        })
    }

    async fn fetch_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        if movie_id == 8195 {
            return Err(AppError::ExternalApi(
                "TMDB API returned status 500 Internal Server Error: ".to_string(),
            ));
        }
        Ok(TmdbMovieDetails {
            id: movie_id,
            title: format!("Film {}", movie_id),
            overview: Some("An overview".to_string()),
            poster_path: (movie_id == 949).then(|| "/heat.jpg".to_string()),
            vote_average: Some(7.5),
            release_date: None,
            genres: vec![],
        })
    }

    async fn fetch_trailer(&self, movie_id: u64) -> AppResult<Option<String>> {
        Ok((movie_id == 949).then(|| "https://www.youtube.com/watch?v=heat".to_string()))
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!("https://img.test{}", poster_path)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn create_test_server() -> TestServer {
    let titles = ["Alien", "Heat", "Ronin", "Thief", "Heat"]
        .iter()
        .map(|t| t.to_string())
        .collect();
    let table = tokio_test::assert_ok!(SimilarityTable::from_parts(
        titles,
        vec![
            vec![1.0, 0.6, 0.6, 0.1, 0.2],
            vec![0.6, 1.0, 0.8, 0.7, 0.9],
            vec![0.6, 0.8, 1.0, 0.5, 0.3],
            vec![0.1, 0.7, 0.5, 1.0, 0.4],
            vec![0.2, 0.9, 0.3, 0.4, 1.0],
        ],
    ));

    let state = Arc::new(AppState::new(Arc::new(table), Arc::new(StubProvider)));
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server();
    let id = "3f2b8c1e-6a55-4f6e-9d0b-2a7f1c9e4b10";
    let response = server
        .get("/health")
        .add_header(REQUEST_ID, HeaderValue::from_static(id))
        .await;
    assert_eq!(response.header(REQUEST_ID), id);
}

#[tokio::test]
async fn test_request_id_generated() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header(REQUEST_ID);
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_list_films() {
    let server = create_test_server();
    let response = server.get("/api/v1/films").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["titles"], json!(["Alien", "Heat", "Ronin", "Thief"]));
}

#[tokio::test]
async fn test_list_films_filtered_and_limited() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/films")
        .add_query_param("q", "i")
        .add_query_param("limit", 2)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["titles"], json!(["Alien", "Ronin"]));
}

#[tokio::test]
async fn test_recommendations_without_enrichment() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Alien", "top_n": 2, "enrich": false }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["found"], true);
    let recs = body["recommendations"].as_array().unwrap();
    // Heat and Ronin tie at 0.6; column order decides
    assert_eq!(recs[0]["title"], "Heat");
    assert_eq!(recs[1]["title"], "Ronin");
    assert_eq!(recs[0]["rank"], 1);
    assert!(recs[0].get("details").is_none());
}

#[tokio::test]
async fn test_recommendations_enriched_with_partial_failure() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Heat", "top_n": 3 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    let titles: Vec<&str> = recs.iter().map(|r| r["title"].as_str().unwrap()).collect();
    // Duplicate "Heat" column is excluded along with the query itself
    assert_eq!(titles, vec!["Ronin", "Thief", "Alien"]);

    assert!(recs[0].get("details").is_none());
    assert!(recs[0]["warning"].as_str().unwrap().contains("500"));

    assert_eq!(recs[1]["details"]["tmdb_id"], 11524);
    assert!(recs[1]["details"]["poster_url"].is_null());
    assert!(recs[1]["details"]["trailer_url"].is_null());

    // No metadata match: neither details nor warning
    assert!(recs[2].get("details").is_none());
    assert!(recs[2].get("warning").is_none());
}

#[tokio::test]
async fn test_recommendations_unknown_title() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Jaws" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["found"], false);
    assert_eq!(body["message"], "Film not found in the database.");
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_recommendations_rejects_large_top_n() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Heat", "top_n": 11 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("top_n"));
}

#[tokio::test]
async fn test_recommendations_rejects_blank_title() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "  " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_missing_title_is_json_error() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "top_n": 2 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_recommendations_negative_top_n_is_json_error() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Heat", "top_n": -1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_films_bad_limit_is_json_error() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/films")
        .add_query_param("limit", "abc")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("query string"));
}
