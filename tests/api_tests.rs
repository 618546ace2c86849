use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use cinematch_api::routes::{create_router, AppState, Limits};
use cinematch_api::services::catalog::InMemoryCatalogStore;

fn create_test_server() -> TestServer {
    let catalog = Arc::new(InMemoryCatalogStore::default());
    let state = AppState::new(catalog, Limits::default());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

async fn seeded_server() -> TestServer {
    let server = create_test_server();
    let response = server
        .post("/api/v1/titles")
        .json(&json!([
            {
                "show_id": "s1",
                "title": "Star Voyage",
                "type": "Movie",
                "listed_in": "Action & Adventure, Sci-Fi & Fantasy",
                "description": "A crew travels through deep space to save a colony."
            },
            {
                "show_id": "s2",
                "title": "Star Voyage: Return",
                "type": "Movie",
                "listed_in": "Action & Adventure, Sci-Fi & Fantasy",
                "description": "The crew returns to deep space to rescue a colony."
            },
            {
                "show_id": "s3",
                "title": "Letters from Paris",
                "type": "Movie",
                "listed_in": "Romantic Movies, Dramas",
                "description": "Two strangers fall in love through letters."
            },
            {
                "show_id": "s4",
                "title": "Kitchen Masters",
                "type": "TV Show",
                "listed_in": "Reality TV",
                "description": "Home cooks compete for a culinary title.",
                "director": ""
            }
        ]))
        .await;
    response.assert_status(StatusCode::CREATED);
    server
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("67e55044-10b1-426f-9247-bb680e5fe0c8"),
        )
        .await;
    assert_eq!(
        response.header("x-request-id"),
        "67e55044-10b1-426f-9247-bb680e5fe0c8"
    );
}

#[tokio::test]
async fn test_import_reports_and_refreshes() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/titles")
        .json(&json!([
            { "show_id": "s1", "title": "One", "listed_in": "Horror" },
            { "show_id": "s2", "title": "Two", "listed_in": "Horror, Thrillers" },
            { "show_id": "s1", "title": "One again" }
        ]))
        .await;

    response.assert_status(StatusCode::CREATED);
    let report: serde_json::Value = response.json();
    assert_eq!(report["inserted"], 2);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["engine"]["ready"], true);
}

#[tokio::test]
async fn test_search_titles() {
    let server = seeded_server().await;

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "star voyage")
        .await;
    response.assert_status_ok();
    let titles: Vec<serde_json::Value> = response.json();
    assert_eq!(titles.len(), 2);
    assert_eq!(titles[0]["title"], "Star Voyage");
    assert_eq!(titles[0]["genres"][1], "Sci-Fi & Fantasy");
    assert_eq!(titles[0]["type"], "Movie");
}

#[tokio::test]
async fn test_search_requires_query() {
    let server = seeded_server().await;
    let response = server.get("/api/v1/titles/search").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_title() {
    let server = seeded_server().await;

    let response = server.get("/api/v1/titles/4").await;
    response.assert_status_ok();
    let title: serde_json::Value = response.json();
    assert_eq!(title["title"], "Kitchen Masters");
    assert!(title["director"].is_null());

    server
        .get("/api/v1/titles/404")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommend_by_title() {
    let server = seeded_server().await;

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Star Voyage")
        .add_query_param("limit", 2)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["source_title"]["title"], "Star Voyage");
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["title"], "Star Voyage: Return");
    assert!(recommendations[0]["similarity"].as_f64().unwrap() > 0.0);
    assert!(recommendations
        .iter()
        .all(|r| r["title"] != "Star Voyage"));
}

#[tokio::test]
async fn test_recommend_by_id() {
    let server = seeded_server().await;

    let response = server.get("/api/v1/titles/2/recommendations").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    assert_eq!(body["recommendations"][0]["id"], 1);
}

#[tokio::test]
async fn test_recommend_unknown_title() {
    let server = seeded_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Nonexistent")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Nonexistent"));
}

#[tokio::test]
async fn test_recommend_rejects_bad_limit() {
    let server = seeded_server().await;
    server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Star")
        .add_query_param("limit", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Star")
        .add_query_param("limit", 500)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_recommendations() {
    let server = seeded_server().await;

    let response = server
        .post("/api/v1/recommendations/group")
        .json(&json!({
            "titles": ["Star Voyage", "Letters from Paris", "Unknown Film"],
            "limit": 5
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["source_titles"].as_array().unwrap().len(), 2);
    assert_eq!(body["unmatched"][0], "Unknown Film");

    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["title"], "Star Voyage: Return");
    for r in recommendations {
        assert_ne!(r["id"], 1);
        assert_ne!(r["id"], 3);
    }
}

#[tokio::test]
async fn test_group_blank_entries_are_unmatched() {
    let server = seeded_server().await;

    let response = server
        .post("/api/v1/recommendations/group")
        .json(&json!({ "titles": ["", "Kitchen Masters", "   "] }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let sources = body["source_titles"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["id"], 4);
    assert_eq!(body["unmatched"].as_array().unwrap().len(), 2);
    assert!(body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == 1));
}

#[tokio::test]
async fn test_group_validation() {
    let server = seeded_server().await;

    server
        .post("/api/v1/recommendations/group")
        .json(&json!({ "titles": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/v1/recommendations/group")
        .json(&json!({ "titles": ["Nothing Matches"] }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_and_status() {
    let server = create_test_server();

    let response = server.get("/api/v1/recommendations/status").await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert!(status["generation"].is_null());

    let response = server.post("/api/v1/recommendations/refresh").await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert_eq!(status["generation"], 1);
    assert_eq!(status["ready"], false);
    assert!(status["failure"]
        .as_str()
        .unwrap()
        .contains("insufficient data"));
}

#[tokio::test]
async fn test_single_title_catalog_returns_empty() {
    let server = create_test_server();
    server
        .post("/api/v1/titles")
        .json(&json!([{ "show_id": "s1", "title": "Lonely", "listed_in": "Dramas" }]))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Lonely")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}
