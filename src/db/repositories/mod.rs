pub mod bookmark;
pub mod conversation;
pub mod history;
pub mod preferences;
pub mod user;
