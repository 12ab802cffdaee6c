use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{conversations, messages, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    pub created_at: String,
}

impl From<messages::Model> for ChatMessage {
    fn from(model: messages::Model) -> Self {
        Self {
            role: model.role,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// Repository for per-article chat transcripts
pub struct ConversationRepository {
    conn: DatabaseConnection,
}

impl ConversationRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user_id: i32, article_url: &str) -> Result<i32> {
        let active = conversations::ActiveModel {
            user_id: Set(Some(user_id)),
            article_url: Set(article_url.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to create conversation")?;
        Ok(model.id)
    }

    /// Latest conversation the user started about this article, if any.
    pub async fn find(&self, user_id: i32, article_url: &str) -> Result<Option<i32>> {
        let row = Conversations::find()
            .filter(conversations::Column::UserId.eq(user_id))
            .filter(conversations::Column::ArticleUrl.eq(article_url))
            .order_by_desc(conversations::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query conversation")?;

        Ok(row.map(|c| c.id))
    }

    pub async fn add_message(&self, conversation_id: i32, role: &str, content: &str) -> Result<()> {
        let active = messages::ActiveModel {
            conversation_id: Set(conversation_id),
            role: Set(role.to_string()),
            content: Set(content.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to save message")?;
        Ok(())
    }

    /// All of the user's messages about an article, oldest first.
    pub async fn messages_for_article(
        &self,
        user_id: i32,
        article_url: &str,
    ) -> Result<Vec<ChatMessage>> {
        let rows = Messages::find()
            .join(JoinType::InnerJoin, messages::Relation::Conversations.def())
            .filter(conversations::Column::UserId.eq(user_id))
            .filter(conversations::Column::ArticleUrl.eq(article_url))
            .order_by_asc(messages::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query messages")?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    /// Number of conversations (owned or orphaned) about an article.
    pub async fn count_for_article(&self, article_url: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        Conversations::find()
            .filter(conversations::Column::ArticleUrl.eq(article_url))
            .count(&self.conn)
            .await
            .context("Failed to count conversations")
    }
}
