use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::Article;

pub mod migrator;
pub mod repositories;

pub use repositories::bookmark::SavedArticle;
pub use repositories::conversation::ChatMessage;
pub use repositories::history::SearchEntry;
pub use repositories::preferences::UserPreferences;
pub use repositories::user::User;

/// Default number of searches shown on the profile page
pub const DEFAULT_HISTORY_LIMIT: u64 = 20;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        if in_memory {
            // Every SQLite connection gets its own in-memory database, so the
            // pool must hold exactly one connection that never gets recycled.
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        // sqlx turns on `foreign_keys` for every SQLite connection; the
        // cascade and set-null rules depend on it.
        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn preferences_repo(&self) -> repositories::preferences::PreferencesRepository {
        repositories::preferences::PreferencesRepository::new(self.conn.clone())
    }

    fn bookmark_repo(&self) -> repositories::bookmark::BookmarkRepository {
        repositories::bookmark::BookmarkRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    fn conversation_repo(&self) -> repositories::conversation::ConversationRepository {
        repositories::conversation::ConversationRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Returns `None` when the username or email already exists.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>> {
        self.user_repo().create(username, email, password_hash).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_profile(&self, user_id: i32, full_name: &str, bio: &str) -> Result<()> {
        self.user_repo().update_profile(user_id, full_name, bio).await
    }

    pub async fn update_user_password_hash(&self, user_id: i32, hash: String) -> Result<()> {
        self.user_repo().update_password_hash(user_id, hash).await
    }

    pub async fn regenerate_user_api_key(&self, user_id: i32) -> Result<String> {
        self.user_repo().regenerate_api_key(user_id).await
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<bool> {
        self.user_repo().delete(user_id).await
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    pub async fn get_preferences(&self, user_id: i32) -> Result<UserPreferences> {
        self.preferences_repo().get_or_create(user_id).await
    }

    pub async fn update_preferences(
        &self,
        user_id: i32,
        categories: &[String],
        sources: &[String],
        keywords: &[String],
    ) -> Result<UserPreferences> {
        self.preferences_repo()
            .update(user_id, categories, sources, keywords)
            .await
    }

    // ------------------------------------------------------------------------
    // Saved articles
    // ------------------------------------------------------------------------

    /// Returns `None` when the user already saved this URL.
    pub async fn save_article(&self, user_id: i32, article: &Article) -> Result<Option<SavedArticle>> {
        self.bookmark_repo().save(user_id, article).await
    }

    pub async fn get_saved_articles(&self, user_id: i32) -> Result<Vec<SavedArticle>> {
        self.bookmark_repo().list(user_id).await
    }

    pub async fn remove_saved_article(&self, user_id: i32, url: &str) -> Result<bool> {
        self.bookmark_repo().remove(user_id, url).await
    }

    // ------------------------------------------------------------------------
    // Search history
    // ------------------------------------------------------------------------

    pub async fn add_search_history(&self, user_id: i32, query: &str) -> Result<()> {
        self.history_repo().add(user_id, query).await
    }

    pub async fn get_search_history(&self, user_id: i32, limit: u64) -> Result<Vec<SearchEntry>> {
        self.history_repo().recent(user_id, limit).await
    }

    // ------------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------------

    pub async fn create_conversation(&self, user_id: i32, article_url: &str) -> Result<i32> {
        self.conversation_repo().create(user_id, article_url).await
    }

    pub async fn find_conversation(&self, user_id: i32, article_url: &str) -> Result<Option<i32>> {
        self.conversation_repo().find(user_id, article_url).await
    }

    pub async fn save_message(&self, conversation_id: i32, role: &str, content: &str) -> Result<()> {
        self.conversation_repo()
            .add_message(conversation_id, role, content)
            .await
    }

    pub async fn get_messages_for_article(
        &self,
        user_id: i32,
        article_url: &str,
    ) -> Result<Vec<ChatMessage>> {
        self.conversation_repo()
            .messages_for_article(user_id, article_url)
            .await
    }

    pub async fn count_conversations_for_article(&self, article_url: &str) -> Result<u64> {
        self.conversation_repo().count_for_article(article_url).await
    }
}
