//! Saved-article endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_article_url;
use super::{ApiError, ApiResponse, AppState, ArticleDto, BookmarkDto, MessageResponse};
use crate::models::Article;
use crate::services::bookmarks_to_csv;

#[derive(Deserialize)]
pub struct UrlQuery {
    #[serde(default)]
    pub url: String,
}

/// GET /bookmarks
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<BookmarkDto>>>, ApiError> {
    let saved = state.shared.account_service.bookmarks(user.id).await?;
    Ok(Json(ApiResponse::success(
        saved.into_iter().map(BookmarkDto::from).collect(),
    )))
}

/// POST /bookmarks
pub async fn save_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ArticleDto>,
) -> Result<impl IntoResponse, ApiError> {
    validate_article_url(&payload.url)?;
    let article = Article::from(payload);

    let saved = state
        .shared
        .account_service
        .save_bookmark(user.id, &article)
        .await?;

    tracing::info!(user_id = user.id, url = %saved.url, "Article saved");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookmarkDto::from(saved))),
    ))
}

/// DELETE /bookmarks?url=
pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if query.url.trim().is_empty() {
        return Err(ApiError::validation("Article URL is required."));
    }

    state
        .shared
        .account_service
        .remove_bookmark(user.id, &query.url)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new("Removed"))))
}

/// GET /bookmarks/export
pub async fn export_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let saved = state.shared.account_service.bookmarks(user.id).await?;
    let csv = bookmarks_to_csv(&saved);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"saved_articles.csv\"",
            ),
        ],
        csv,
    ))
}
