use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{prelude::*, search_history};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub query: String,
    pub created_at: String,
}

/// Append-only log of a user's searches
pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, user_id: i32, query: &str) -> Result<()> {
        let active = search_history::ActiveModel {
            user_id: Set(user_id),
            query: Set(query.trim().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to record search")?;
        Ok(())
    }

    /// Most recent first
    pub async fn recent(&self, user_id: i32, limit: u64) -> Result<Vec<SearchEntry>> {
        let rows = SearchHistory::find()
            .filter(search_history::Column::UserId.eq(user_id))
            .order_by_desc(search_history::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query search history")?;

        Ok(rows
            .into_iter()
            .map(|r| SearchEntry {
                query: r.query,
                created_at: r.created_at,
            })
            .collect())
    }
}
