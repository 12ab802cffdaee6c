pub mod article;
pub mod topic;

pub use article::{Article, ArticleCard, Sentiment, SentimentLabel, estimate_read_time, plain_text};
pub use topic::Topic;
