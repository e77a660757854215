//! # HTTP routes
//!
//! Read-only JSON endpoints for an article and its comment tree.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use domains::ArticleId;
use services::ArticleService;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::response::{ArticleWithCommentsResponse, CommentResponse};

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub articles: ArticleService,
}

/// Builds the router. Mount it under a prefix with `Router::nest` if needed.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/articles/{id}", get(article_with_comments))
        .route("/articles/{id}/comments", get(article_comments))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn article_with_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleWithCommentsResponse>, ApiError> {
    let value = state.articles.article_with_comments(ArticleId(id)).await?;
    Ok(Json(ArticleWithCommentsResponse::from(&value)))
}

async fn article_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let forest = state.articles.comments(ArticleId(id)).await?;
    Ok(Json(CommentResponse::from_forest(&forest)))
}
