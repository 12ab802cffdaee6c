use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, sea_query::OnConflict,
};

use crate::entities::{preferences, prelude::*};

/// A user's feed filters, split back into lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    pub user_id: i32,
    pub categories: Vec<String>,
    pub sources: Vec<String>,
    pub keywords: Vec<String>,
    pub updated_at: String,
}

impl From<preferences::Model> for UserPreferences {
    fn from(model: preferences::Model) -> Self {
        Self {
            user_id: model.user_id,
            categories: split_list(&model.categories),
            sources: split_list(&model.sources),
            keywords: split_list(&model.keywords),
            updated_at: model.updated_at,
        }
    }
}

pub struct PreferencesRepository {
    conn: DatabaseConnection,
}

impl PreferencesRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the user's preferences, creating an empty row on first access.
    pub async fn get_or_create(&self, user_id: i32) -> Result<UserPreferences> {
        if let Some(existing) = Preferences::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query preferences")?
        {
            return Ok(existing.into());
        }

        let active = preferences::ActiveModel {
            user_id: Set(user_id),
            categories: Set(String::new()),
            sources: Set(String::new()),
            keywords: Set(String::new()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        // A concurrent request may have created the row in the meantime.
        Preferences::insert(active)
            .on_conflict(
                OnConflict::column(preferences::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(&self.conn)
            .await
            .context("Failed to create preferences")?;

        Preferences::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query preferences")?
            .map(UserPreferences::from)
            .ok_or_else(|| anyhow::anyhow!("Preferences missing for user {user_id}"))
    }

    pub async fn update(
        &self,
        user_id: i32,
        categories: &[String],
        sources: &[String],
        keywords: &[String],
    ) -> Result<UserPreferences> {
        self.get_or_create(user_id).await?;

        let active = preferences::ActiveModel {
            user_id: Set(user_id),
            categories: Set(join_list(categories)),
            sources: Set(join_list(sources)),
            keywords: Set(join_list(keywords)),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update preferences")?;

        Ok(model.into())
    }
}

/// Trims, drops empties, de-duplicates and sorts, then joins with commas.
#[must_use]
pub fn join_list(items: &[String]) -> String {
    let mut cleaned: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    cleaned.sort_unstable();
    cleaned.dedup();
    cleaned.join(",")
}

#[must_use]
pub fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_join_list_normalizes() {
        let joined = join_list(&strings(&[" science", "", "business", "science ", "  "]));
        assert_eq!(joined, "business,science");
    }

    #[test]
    fn test_split_list_skips_empties() {
        assert_eq!(split_list(""), Vec::<String>::new());
        assert_eq!(split_list("a,,b"), strings(&["a", "b"]));
    }
}
