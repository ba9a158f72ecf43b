use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use super::context::{ContextPayload, ContextQuery, ContextService};
use super::domain::{NewsQuery, NewsResponse};
use super::service::NewsService;
use super::source::FeedSource;
use crate::error::AppError;

/// Shared handles for the feed endpoints.
pub struct FeedState<S> {
    pub news: Arc<NewsService<S>>,
    pub context: Arc<ContextService>,
}

impl<S> Clone for FeedState<S> {
    fn clone(&self) -> Self {
        Self {
            news: Arc::clone(&self.news),
            context: Arc::clone(&self.context),
        }
    }
}

/// Router builder exposing the cached news listing and document context lookups.
pub fn news_router<S>(news: Arc<NewsService<S>>, context: Arc<ContextService>) -> Router
where
    S: FeedSource + 'static,
{
    Router::new()
        .route("/api/news/lex", get(news_handler::<S>))
        .route("/api/context/lex", get(context_handler::<S>))
        .with_state(FeedState { news, context })
}

pub(crate) async fn news_handler<S>(
    State(state): State<FeedState<S>>,
    query: Result<Query<NewsQuery>, QueryRejection>,
) -> Result<Json<NewsResponse>, AppError>
where
    S: FeedSource + 'static,
{
    let Query(query) = query.map_err(rejected_query)?;
    query.validate().map_err(AppError::InvalidRequest)?;
    let response = state.news.latest(&query).await?;
    Ok(Json(response))
}

pub(crate) async fn context_handler<S>(
    State(state): State<FeedState<S>>,
    query: Result<Query<ContextQuery>, QueryRejection>,
) -> Result<Json<ContextPayload>, AppError>
where
    S: FeedSource + 'static,
{
    let Query(query) = query.map_err(rejected_query)?;
    let payload = state.context.fetch(&query).await?;
    Ok(Json(payload))
}

/// Unknown `mode` values and non-numeric limits surface as our JSON error body.
fn rejected_query(rejection: QueryRejection) -> AppError {
    AppError::InvalidRequest(rejection.body_text())
}
