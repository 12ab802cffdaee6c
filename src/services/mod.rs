pub mod account;
pub use account::{AccountError, AccountService, Profile};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod discussion;
pub use discussion::{Answer, DiscussionError, DiscussionService};

pub mod export;
pub use export::bookmarks_to_csv;

pub mod news;
pub use news::{HomeFeed, NewsError, NewsService, SearchParams, TopicSection, article_card};

pub mod sentiment;
pub use sentiment::{SentimentAnalyzer, VaderAnalyzer};
