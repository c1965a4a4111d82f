// src/api.rs
//! Read-only JSON feed for the presentation layer.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::engine::ContentEngine;

/// Response header reporting whether remote content took part.
pub const REMOTE_HEADER: &str = "x-catalog-remote";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ContentEngine>,
}

impl AppState {
    pub fn new(engine: ContentEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/posts", get(list_posts))
        .route("/posts/featured", get(featured_post))
        .route("/posts/{slug}", get(post_by_slug))
        .route("/posts/{slug}/related", get(related_posts))
        .route("/categories", get(list_categories))
        .route("/debug/duplicate-assets", get(duplicate_assets))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn list_posts(State(state): State<AppState>) -> Response {
    let catalog = state.engine.resolve_catalog().await;
    let remote = catalog.remote_status().as_str();
    ([(REMOTE_HEADER, remote)], Json(catalog)).into_response()
}

async fn featured_post(State(state): State<AppState>) -> Response {
    let catalog = state.engine.resolve_catalog().await;
    let remote = catalog.remote_status().as_str();
    // Absence is `null`, not an error.
    ([(REMOTE_HEADER, remote)], Json(catalog.featured())).into_response()
}

async fn post_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let catalog = state.engine.resolve_catalog().await;
    let remote = catalog.remote_status().as_str();
    match catalog.by_slug(&slug) {
        Some(rec) => ([(REMOTE_HEADER, remote)], Json(rec)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(REMOTE_HEADER, remote)],
            Json(json!({ "error": "not found", "slug": slug })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct RelatedQuery {
    limit: Option<usize>,
}

async fn related_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(q): Query<RelatedQuery>,
) -> Response {
    let limit = q.limit.unwrap_or_else(|| state.engine.related_limit());
    let catalog = state.engine.resolve_catalog().await;
    let remote = catalog.remote_status().as_str();
    ([(REMOTE_HEADER, remote)], Json(catalog.related(&slug, limit))).into_response()
}

async fn list_categories(State(state): State<AppState>) -> Response {
    let catalog = state.engine.resolve_catalog().await;
    let remote = catalog.remote_status().as_str();
    ([(REMOTE_HEADER, remote)], Json(catalog.categories())).into_response()
}

async fn duplicate_assets(State(state): State<AppState>) -> Response {
    Json(state.engine.find_duplicate_assets()).into_response()
}
