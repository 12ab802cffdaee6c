use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::entities::{prelude::*, saved_articles};
use crate::models::Article;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArticle {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: String,
    pub source: String,
    pub published_at: String,
    pub image_url: String,
    pub saved_at: String,
}

impl From<saved_articles::Model> for SavedArticle {
    fn from(model: saved_articles::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            url: model.url,
            description: model.description,
            source: model.source,
            published_at: model.published_at,
            image_url: model.image_url,
            saved_at: model.saved_at,
        }
    }
}

/// Repository for bookmarked articles
pub struct BookmarkRepository {
    conn: DatabaseConnection,
}

impl BookmarkRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns `None` if the user already saved this URL.
    pub async fn save(&self, user_id: i32, article: &Article) -> Result<Option<SavedArticle>> {
        let active = saved_articles::ActiveModel {
            user_id: Set(user_id),
            title: Set(article.title.trim().to_string()),
            url: Set(article.url.trim().to_string()),
            description: Set(article.description.clone()),
            source: Set(article.source.clone()),
            published_at: Set(article.published_at.clone()),
            image_url: Set(article.image_url.clone()),
            saved_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(model.into())),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to save article"),
        }
    }

    /// Newest bookmark first
    pub async fn list(&self, user_id: i32) -> Result<Vec<SavedArticle>> {
        let rows = SavedArticles::find()
            .filter(saved_articles::Column::UserId.eq(user_id))
            .order_by_desc(saved_articles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list saved articles")?;

        Ok(rows.into_iter().map(SavedArticle::from).collect())
    }

    pub async fn remove(&self, user_id: i32, url: &str) -> Result<bool> {
        let result = SavedArticles::delete_many()
            .filter(saved_articles::Column::UserId.eq(user_id))
            .filter(saved_articles::Column::Url.eq(url.trim()))
            .exec(&self.conn)
            .await
            .context("Failed to remove saved article")?;

        Ok(result.rows_affected > 0)
    }
}
