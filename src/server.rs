//! HTTP surface consumed by the UI layer.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::catalog;
use crate::discovery::Discovery;
use crate::error::Error;
use crate::github::RepositoryProvider;
use crate::types::{
    DifficultyLevel, Pagination, SearchQuery, SearchResponse, Since, Strategy, TrendingQuery,
    TrendingResponse,
};

pub fn router<P>(discovery: Arc<Discovery<P>>) -> Router
where
    P: RepositoryProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(languages))
        .route("/api/repositories/search", get(search::<P>))
        .route("/api/repositories/trending", get(trending::<P>))
        .with_state(discovery)
}

pub async fn serve<P>(bind_addr: &str, discovery: Arc<Discovery<P>>) -> anyhow::Result<()>
where
    P: RepositoryProvider + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);
    axum::serve(listener, router(discovery)).await?;
    Ok(())
}

/// A fatal upstream failure, reported as `{ "error", "details" }` with a 500.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: Error,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}: {}", self.message, self.source);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": self.message,
                "details": self.source.to_string(),
            })),
        )
            .into_response()
    }
}

/// Query values are accepted as raw strings so malformed numbers fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub language: Option<String>,
    pub level: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> SearchQuery {
        SearchQuery {
            text: self.q.unwrap_or_default(),
            language: self.language,
            level: self.level.as_deref().and_then(DifficultyLevel::parse),
            pagination: pagination(self.page.as_deref(), self.per_page.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendingParams {
    pub language: Option<String>,
    pub since: Option<String>,
    pub strategy: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl TrendingParams {
    pub fn into_query(self) -> TrendingQuery {
        TrendingQuery {
            language: self.language,
            since: self.since.as_deref().map(Since::parse).unwrap_or_default(),
            strategy: self.strategy.as_deref().map(Strategy::parse).unwrap_or_default(),
            pagination: pagination(self.page.as_deref(), self.per_page.as_deref()),
        }
    }
}

fn pagination(page: Option<&str>, per_page: Option<&str>) -> Pagination {
    let number = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<u32>().ok()).unwrap_or(0);
    Pagination::new(number(page), number(per_page))
}

async fn health() -> &'static str {
    "ok"
}

async fn languages() -> Json<&'static [catalog::Language]> {
    Json(catalog::LANGUAGES)
}

/// GET /api/repositories/search
async fn search<P: RepositoryProvider>(
    State(discovery): State<Arc<Discovery<P>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let now = Utc::now();
    discovery
        .search(&params.into_query(), now)
        .await
        .map(Json)
        .map_err(|source| ApiError {
            message: "Failed to search repositories",
            source,
        })
}

/// GET /api/repositories/trending
async fn trending<P: RepositoryProvider>(
    State(discovery): State<Arc<Discovery<P>>>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let now = Utc::now();
    discovery
        .trending(&params.into_query(), now)
        .await
        .map(Json)
        .map_err(|source| ApiError {
            message: "Failed to fetch trending repositories",
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_paging_falls_back_to_defaults() {
        let query = SearchParams {
            page: Some("abc".into()),
            per_page: Some("0".into()),
            ..Default::default()
        }
        .into_query();
        assert_eq!(query.pagination, Pagination::new(1, 12));
    }

    #[test]
    fn per_page_is_capped() {
        let query = TrendingParams {
            per_page: Some("250".into()),
            ..Default::default()
        }
        .into_query();
        assert_eq!(query.pagination.per_page, 100);
        assert_eq!(query.since, Since::Weekly);
        assert_eq!(query.strategy, Strategy::Balanced);
    }

    #[test]
    fn level_hint_is_parsed_leniently() {
        let query = SearchParams {
            level: Some("all".into()),
            ..Default::default()
        }
        .into_query();
        assert!(query.level.is_none());
    }
}
