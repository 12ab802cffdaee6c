pub mod prelude;

pub mod conversations;
pub mod messages;
pub mod preferences;
pub mod saved_articles;
pub mod search_history;
pub mod users;
