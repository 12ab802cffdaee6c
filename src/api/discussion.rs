//! Article discussion endpoints backed by the chat model.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::bookmarks::UrlQuery;
use super::validation::validate_article_url;
use super::{ApiError, ApiResponse, AppState, ArticleDto};
use crate::db::ChatMessage;
use crate::models::Article;
use crate::services::Answer;

#[derive(Deserialize)]
pub struct AskRequest {
    pub article: ArticleDto,
    #[serde(default)]
    pub question: String,
}

#[derive(Deserialize)]
pub struct ArticleRequest {
    pub article: ArticleDto,
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Serialize)]
pub struct MessageDto {
    pub role: String,
    pub content: String,
    pub created_at: String,
}

impl From<ChatMessage> for MessageDto {
    fn from(m: ChatMessage) -> Self {
        Self {
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// GET /discussion?url=
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<ApiResponse<Vec<MessageDto>>>, ApiError> {
    let url = validate_article_url(&query.url)?;
    let messages = state
        .shared
        .discussion_service
        .transcript(user.id, url)
        .await?;

    Ok(Json(ApiResponse::success(
        messages.into_iter().map(MessageDto::from).collect(),
    )))
}

/// POST /discussion/ask
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<ApiResponse<Answer>>, ApiError> {
    validate_article_url(&payload.article.url)?;
    let article = Article::from(payload.article);

    let answer = state
        .shared
        .discussion_service
        .ask(user.id, &article, &payload.question)
        .await?;

    Ok(Json(ApiResponse::success(answer)))
}

/// POST /discussion/questions
pub async fn suggest_questions(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ArticleRequest>,
) -> Result<Json<ApiResponse<QuestionsResponse>>, ApiError> {
    let article = Article::from(payload.article);
    let questions = state
        .shared
        .discussion_service
        .suggest_questions(&article)
        .await?;

    Ok(Json(ApiResponse::success(QuestionsResponse { questions })))
}

/// POST /discussion/summary
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ArticleRequest>,
) -> Result<Json<ApiResponse<SummaryResponse>>, ApiError> {
    let article = Article::from(payload.article);
    let summary = state.shared.discussion_service.summarize(&article).await?;

    Ok(Json(ApiResponse::success(SummaryResponse { summary })))
}
