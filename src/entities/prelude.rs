pub use super::conversations::Entity as Conversations;
pub use super::messages::Entity as Messages;
pub use super::preferences::Entity as Preferences;
pub use super::saved_articles::Entity as SavedArticles;
pub use super::search_history::Entity as SearchHistory;
pub use super::users::Entity as Users;
