//! Profile, preferences and bookmarks for a signed-in user.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::db::{DEFAULT_HISTORY_LIMIT, SavedArticle, SearchEntry, Store, UserPreferences};
use crate::models::{Article, Topic};

/// Maximum number of categories a user may follow.
pub const MAX_CATEGORIES: usize = 5;

/// Upper bound on `limit` for the history listing.
pub const MAX_HISTORY_LIMIT: u64 = 200;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("User not found")]
    UserNotFound,

    #[error("Bookmark not found")]
    BookmarkNotFound,

    #[error("Already saved.")]
    AlreadySaved,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub joined_at: String,
}

pub struct AccountService {
    store: Store,
}

impl AccountService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn profile(&self, user_id: i32) -> Result<Profile, AccountError> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        Ok(Profile {
            username: user.username,
            email: user.email,
            full_name: user.full_name.unwrap_or_default(),
            bio: user.bio.unwrap_or_default(),
            joined_at: user.joined_at,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        full_name: &str,
        bio: &str,
    ) -> Result<Profile, AccountError> {
        self.store.update_profile(user_id, full_name, bio).await?;
        info!(user_id, "Profile updated");
        self.profile(user_id).await
    }

    pub async fn recent_searches(
        &self,
        user_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<SearchEntry>, AccountError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        Ok(self.store.get_search_history(user_id, limit).await?)
    }

    pub async fn preferences(&self, user_id: i32) -> Result<UserPreferences, AccountError> {
        Ok(self.store.get_preferences(user_id).await?)
    }

    /// Categories are stored by their canonical lowercase name.
    pub async fn update_preferences(
        &self,
        user_id: i32,
        categories: &[String],
        sources: &[String],
        keywords: &[String],
    ) -> Result<UserPreferences, AccountError> {
        let categories = validate_categories(categories)?;
        let prefs = self
            .store
            .update_preferences(user_id, &categories, sources, keywords)
            .await?;

        info!(user_id, categories = ?prefs.categories, "Preferences updated");
        Ok(prefs)
    }

    pub async fn bookmarks(&self, user_id: i32) -> Result<Vec<SavedArticle>, AccountError> {
        Ok(self.store.get_saved_articles(user_id).await?)
    }

    pub async fn save_bookmark(
        &self,
        user_id: i32,
        article: &Article,
    ) -> Result<SavedArticle, AccountError> {
        if article.url.trim().is_empty() {
            return Err(AccountError::Validation("Article URL is required.".to_string()));
        }
        if article.title.trim().is_empty() {
            return Err(AccountError::Validation("Article title is required.".to_string()));
        }

        self.store
            .save_article(user_id, article)
            .await?
            .ok_or(AccountError::AlreadySaved)
    }

    pub async fn remove_bookmark(&self, user_id: i32, url: &str) -> Result<(), AccountError> {
        if self.store.remove_saved_article(user_id, url.trim()).await? {
            Ok(())
        } else {
            Err(AccountError::BookmarkNotFound)
        }
    }
}

/// Parses, de-duplicates and bounds the category list.
pub fn validate_categories(categories: &[String]) -> Result<Vec<String>, AccountError> {
    let mut topics: Vec<Topic> = Vec::with_capacity(categories.len());
    for raw in categories.iter().filter(|c| !c.trim().is_empty()) {
        let topic: Topic = raw.parse().map_err(AccountError::Validation)?;
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }

    if topics.len() > MAX_CATEGORIES {
        return Err(AccountError::Validation(format!(
            "Pick at most {MAX_CATEGORIES} categories."
        )));
    }

    Ok(topics.iter().map(|t| t.as_str().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_validate_categories() {
        let ok = validate_categories(&strings(&["Technology", " science ", "technology", ""])).unwrap();
        assert_eq!(ok, strings(&["technology", "science"]));

        assert!(matches!(
            validate_categories(&strings(&["gardening"])),
            Err(AccountError::Validation(_))
        ));

        let six = strings(&["world", "nation", "business", "technology", "sports", "health"]);
        assert!(validate_categories(&six).is_err());
    }

    async fn store() -> Store {
        let path = std::env::temp_dir().join(format!("newspulse-account-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", path.display())).await.unwrap()
    }

    #[tokio::test]
    async fn test_bookmarks_conflict_and_missing() {
        let store = store().await;
        let user = store.create_user("dana", "dana@example.com", "x").await.unwrap().unwrap();
        let account = AccountService::new(store);

        let article = Article {
            title: "Title".to_string(),
            url: "https://example.com/a".to_string(),
            ..Article::default()
        };
        account.save_bookmark(user.id, &article).await.unwrap();

        let again = account.save_bookmark(user.id, &article).await.unwrap_err();
        assert_eq!(again.to_string(), "Already saved.");

        account.remove_bookmark(user.id, "https://example.com/a").await.unwrap();
        assert!(matches!(
            account.remove_bookmark(user.id, "https://example.com/a").await,
            Err(AccountError::BookmarkNotFound)
        ));
    }

    #[tokio::test]
    async fn test_profile_defaults_to_empty_strings() {
        let store = store().await;
        let user = store.create_user("erin", "erin@example.com", "x").await.unwrap().unwrap();
        let account = AccountService::new(store);

        let profile = account.profile(user.id).await.unwrap();
        assert_eq!(profile.full_name, "");

        let profile = account.update_profile(user.id, " Erin E ", "hi").await.unwrap();
        assert_eq!(profile.full_name, "Erin E");
        assert_eq!(profile.bio, "hi");
    }
}
