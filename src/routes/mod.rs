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
    config::Config,
    engine::RecommendationEngine,
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::catalog::CatalogStore,
};

pub mod admin;
pub mod recommendations;
pub mod titles;

/// Result-size limits applied by the handlers
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub default_limit: usize,
    pub max_limit: usize,
    pub search_limit: usize,
}

impl Limits {
    /// Resolves a caller-supplied recommendation limit
    pub fn resolve(&self, requested: Option<usize>) -> AppResult<usize> {
        match requested {
            None => Ok(self.default_limit),
            Some(0) => Err(AppError::InvalidInput(
                "limit must be at least 1".to_string(),
            )),
            Some(limit) if limit > self.max_limit => Err(AppError::InvalidInput(format!(
                "limit must not exceed {}",
                self.max_limit
            ))),
            Some(limit) => Ok(limit),
        }
    }
}

impl From<&Config> for Limits {
    fn from(config: &Config) -> Self {
        Self {
            default_limit: config.default_limit,
            max_limit: config.max_limit,
            search_limit: config.search_limit,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 50,
            search_limit: 10,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub engine: Arc<RecommendationEngine>,
    pub limits: Limits,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, limits: Limits) -> Self {
        let engine = Arc::new(RecommendationEngine::new(Arc::clone(&catalog)));
        Self {
            catalog,
            engine,
            limits,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
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
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/titles", post(titles::import))
        .route("/titles/search", get(titles::search))
        .route("/titles/:id", get(titles::get_title))
        .route("/titles/:id/recommendations", get(recommendations::by_id))
        .route("/recommendations", get(recommendations::by_title))
        .route("/recommendations/group", post(recommendations::group))
        .route("/recommendations/refresh", post(admin::refresh))
        .route("/recommendations/status", get(admin::status))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
