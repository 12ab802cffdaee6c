use serde::{Deserialize, Serialize};

use crate::db::{SavedArticle, SearchEntry, UserPreferences};
use crate::models::Article;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An article as posted by the client for bookmarking or discussion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticleDto {
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    #[serde(alias = "image")]
    pub image_url: String,
    #[serde(alias = "publishedAt")]
    pub published_at: String,
    pub source: String,
}

impl From<ArticleDto> for Article {
    fn from(dto: ArticleDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            content: dto.content,
            url: dto.url,
            image_url: dto.image_url,
            published_at: dto.published_at,
            source: dto.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookmarkDto {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: String,
    pub source: String,
    pub published_at: String,
    pub image_url: String,
    pub saved_at: String,
}

impl From<SavedArticle> for BookmarkDto {
    fn from(a: SavedArticle) -> Self {
        Self {
            id: a.id,
            title: a.title,
            url: a.url,
            description: a.description,
            source: a.source,
            published_at: a.published_at,
            image_url: a.image_url,
            saved_at: a.saved_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreferencesDto {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_deserializing)]
    pub updated_at: String,
}

impl From<UserPreferences> for PreferencesDto {
    fn from(p: UserPreferences) -> Self {
        Self {
            categories: p.categories,
            sources: p.sources,
            keywords: p.keywords,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchEntryDto {
    pub query: String,
    pub created_at: String,
}

impl From<SearchEntry> for SearchEntryDto {
    fn from(e: SearchEntry) -> Self {
        Self {
            query: e.query,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopicDto {
    pub id: &'static str,
    pub title: String,
}
