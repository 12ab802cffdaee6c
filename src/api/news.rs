//! News feed, search and sentiment endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_search_query, validate_topic};
use super::{ApiError, ApiResponse, AppState, TopicDto};
use crate::models::{ArticleCard, Sentiment, Topic};
use crate::services::{HomeFeed, SearchParams};

#[derive(Deserialize)]
pub struct HeadlinesQuery {
    pub topic: Option<String>,
    pub max: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub lang: Option<String>,
    pub country: Option<String>,
    pub max: Option<u32>,
}

#[derive(Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub text: String,
}

/// GET /news/home
pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<HomeFeed>>, ApiError> {
    let feed = state.shared.news_service.home(user.id).await?;
    Ok(Json(ApiResponse::success(feed)))
}

/// GET /news/headlines?topic=&max=
pub async fn headlines(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HeadlinesQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleCard>>>, ApiError> {
    let topic = validate_topic(query.topic.as_deref())?;
    let cards = state
        .shared
        .news_service
        .headlines(topic, query.max)
        .await?;
    Ok(Json(ApiResponse::success(cards)))
}

/// GET /news/search?q=&lang=&country=&max=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleCard>>>, ApiError> {
    let q = validate_search_query(&query.q)?;
    let params = SearchParams {
        query: q.to_string(),
        lang: query.lang,
        country: query.country,
        max: query.max,
    };

    let cards = state.shared.news_service.search(user.id, &params).await?;
    Ok(Json(ApiResponse::success(cards)))
}

/// GET /news/topics
pub async fn topics() -> Json<ApiResponse<Vec<TopicDto>>> {
    Json(ApiResponse::success(
        Topic::ALL
            .iter()
            .map(|t| TopicDto {
                id: t.as_str(),
                title: t.title(),
            })
            .collect(),
    ))
}

/// POST /sentiment
pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SentimentRequest>,
) -> Json<ApiResponse<Sentiment>> {
    Json(ApiResponse::success(
        state.shared.sentiment.analyze(&payload.text),
    ))
}
