//! Profile, search history and preferences endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_limit;
use super::{ApiError, ApiResponse, AppState, PreferencesDto, SearchEntryDto};
use crate::services::Profile;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

/// GET /profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.shared.account_service.profile(user.id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// PUT /profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state
        .shared
        .account_service
        .update_profile(user.id, &payload.full_name, &payload.bio)
        .await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// GET /profile/history?limit=
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<SearchEntryDto>>>, ApiError> {
    let limit = query.limit.map(validate_limit).transpose()?;
    let entries = state
        .shared
        .account_service
        .recent_searches(user.id, limit)
        .await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(SearchEntryDto::from).collect(),
    )))
}

/// GET /preferences
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<PreferencesDto>>, ApiError> {
    let prefs = state.shared.account_service.preferences(user.id).await?;
    Ok(Json(ApiResponse::success(prefs.into())))
}

/// PUT /preferences
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PreferencesDto>,
) -> Result<Json<ApiResponse<PreferencesDto>>, ApiError> {
    let prefs = state
        .shared
        .account_service
        .update_preferences(
            user.id,
            &payload.categories,
            &payload.sources,
            &payload.keywords,
        )
        .await?;
    Ok(Json(ApiResponse::success(prefs.into())))
}
