//! Home feed, headlines and search, with cards enriched for display.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::clients::gnews::{GNewsClient, GNewsError, QueryOptions};
use crate::db::{Store, UserPreferences};
use crate::models::{Article, ArticleCard, Topic, estimate_read_time, plain_text};
use crate::services::sentiment::SentimentAnalyzer;

/// Headlines per home-page category.
pub const HOME_SECTION_SIZE: u32 = 5;

/// Size of the "latest picks" list.
pub const LATEST_PICKS_SIZE: u32 = 10;

/// Home page shows at most this many of the user's categories.
pub const HOME_MAX_SECTIONS: usize = 3;

pub const SEARCH_DEFAULT_MAX: u32 = 15;
pub const SEARCH_MIN_MAX: u32 = 5;
pub const SEARCH_MAX_MAX: u32 = 50;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] GNewsError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for NewsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicSection {
    pub topic: Topic,
    pub title: String,
    pub articles: Vec<ArticleCard>,
    /// Set when this topic could not be fetched; the rest of the page still renders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub sections: Vec<TopicSection>,
    pub latest: Vec<ArticleCard>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub lang: Option<String>,
    pub country: Option<String>,
    pub max: Option<u32>,
}

pub struct NewsService {
    store: Store,
    gnews: GNewsClient,
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl NewsService {
    #[must_use]
    pub fn new(store: Store, gnews: GNewsClient, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self {
            store,
            gnews,
            analyzer,
        }
    }

    #[must_use]
    pub fn card(&self, article: Article) -> ArticleCard {
        article_card(self.analyzer.as_ref(), article)
    }

    fn cards(&self, articles: Vec<Article>) -> Vec<ArticleCard> {
        articles.into_iter().map(|a| self.card(a)).collect()
    }

    pub async fn home(&self, user_id: i32) -> Result<HomeFeed, NewsError> {
        let prefs = self.store.get_preferences(user_id).await?;
        let topics = home_topics(&prefs);
        debug!(user_id, ?topics, "Building home feed");

        let opts = QueryOptions {
            max: Some(HOME_SECTION_SIZE),
            ..QueryOptions::default()
        };
        let fetches = topics
            .iter()
            .map(|topic| self.gnews.top_headlines(Some(*topic), &opts));
        let results = join_all(fetches).await;

        let sections = topics
            .into_iter()
            .zip(results)
            .map(|(topic, result)| match result {
                Ok(articles) => TopicSection {
                    topic,
                    title: topic.title(),
                    articles: self.cards(articles),
                    error: None,
                },
                Err(e) => {
                    warn!(%topic, error = %e, "Failed to load topic headlines");
                    TopicSection {
                        topic,
                        title: topic.title(),
                        articles: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect();

        let latest = self
            .gnews
            .top_headlines(
                None,
                &QueryOptions {
                    max: Some(LATEST_PICKS_SIZE),
                    ..QueryOptions::default()
                },
            )
            .await?;

        Ok(HomeFeed {
            sections,
            latest: rank_by_preferences(self.cards(latest), &prefs),
        })
    }

    pub async fn headlines(
        &self,
        topic: Option<Topic>,
        max: Option<u32>,
    ) -> Result<Vec<ArticleCard>, NewsError> {
        let articles = self
            .gnews
            .top_headlines(
                topic,
                &QueryOptions {
                    max,
                    ..QueryOptions::default()
                },
            )
            .await?;
        Ok(self.cards(articles))
    }

    /// Records the query in the user's history, then searches.
    pub async fn search(
        &self,
        user_id: i32,
        params: &SearchParams,
    ) -> Result<Vec<ArticleCard>, NewsError> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(NewsError::Validation("Please enter a search term.".to_string()));
        }

        self.store.add_search_history(user_id, query).await?;

        let opts = QueryOptions {
            lang: non_blank(params.lang.as_deref()),
            country: non_blank(params.country.as_deref()),
            max: Some(search_limit(params.max)),
        };
        let articles = self.gnews.search(query, &opts).await?;
        Ok(self.cards(articles))
    }
}

/// Adds sentiment and read time to a raw article. Read time comes from the
/// description, or the title when there is none.
#[must_use]
pub fn article_card(analyzer: &dyn SentimentAnalyzer, article: Article) -> ArticleCard {
    let sentiment = analyzer.analyze_article(&article);
    let description = plain_text(&article.description);
    let read_minutes = if description.trim().is_empty() {
        estimate_read_time(&article.title)
    } else {
        estimate_read_time(&description)
    };

    ArticleCard {
        article,
        sentiment,
        read_minutes,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[must_use]
pub fn search_limit(max: Option<u32>) -> u32 {
    max.unwrap_or(SEARCH_DEFAULT_MAX)
        .clamp(SEARCH_MIN_MAX, SEARCH_MAX_MAX)
}

/// Up to three known categories from the user's preferences, or the defaults.
#[must_use]
pub fn home_topics(prefs: &UserPreferences) -> Vec<Topic> {
    let chosen: Vec<Topic> = prefs
        .categories
        .iter()
        .filter_map(|c| c.parse().ok())
        .take(HOME_MAX_SECTIONS)
        .collect();

    if chosen.is_empty() {
        Topic::HOME_DEFAULTS.to_vec()
    } else {
        chosen
    }
}

/// Moves articles from preferred sources or mentioning a keyword to the front.
/// Relative order is otherwise preserved.
#[must_use]
pub fn rank_by_preferences(mut cards: Vec<ArticleCard>, prefs: &UserPreferences) -> Vec<ArticleCard> {
    if prefs.sources.is_empty() && prefs.keywords.is_empty() {
        return cards;
    }

    let sources: Vec<String> = prefs.sources.iter().map(|s| s.to_lowercase()).collect();
    let keywords: Vec<String> = prefs.keywords.iter().map(|k| k.to_lowercase()).collect();

    cards.sort_by_key(|card| !matches_preferences(&card.article, &sources, &keywords));
    cards
}

fn matches_preferences(article: &Article, sources: &[String], keywords: &[String]) -> bool {
    let source = article.source.to_lowercase();
    if sources.iter().any(|s| *s == source) {
        return true;
    }

    let haystack = format!("{} {}", article.title, article.description).to_lowercase();
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    fn prefs(categories: &[&str], sources: &[&str], keywords: &[&str]) -> UserPreferences {
        let owned = |items: &[&str]| items.iter().map(ToString::to_string).collect();
        UserPreferences {
            user_id: 1,
            categories: owned(categories),
            sources: owned(sources),
            keywords: owned(keywords),
            updated_at: String::new(),
        }
    }

    fn card(title: &str, source: &str) -> ArticleCard {
        ArticleCard {
            article: Article {
                title: title.to_string(),
                source: source.to_string(),
                ..Article::default()
            },
            sentiment: Sentiment::NEUTRAL,
            read_minutes: 1,
        }
    }

    fn titles(cards: &[ArticleCard]) -> Vec<&str> {
        cards.iter().map(|c| c.article.title.as_str()).collect()
    }

    #[test]
    fn test_home_topics_defaults_and_limit() {
        assert_eq!(home_topics(&prefs(&[], &[], &[])), Topic::HOME_DEFAULTS.to_vec());
        assert_eq!(
            home_topics(&prefs(&["bogus"], &[], &[])),
            Topic::HOME_DEFAULTS.to_vec()
        );
        assert_eq!(
            home_topics(&prefs(&["health", "sports", "world", "science"], &[], &[])),
            vec![Topic::Health, Topic::Sports, Topic::World]
        );
    }

    #[test]
    fn test_rank_is_stable() {
        let cards = vec![
            card("a", "Wire"),
            card("b rust release", "Wire"),
            card("c", "BBC News"),
            card("d", "Wire"),
            card("e Rust again", "Other"),
        ];

        let ranked = rank_by_preferences(cards, &prefs(&[], &["bbc news"], &["Rust"]));
        assert_eq!(titles(&ranked), vec!["b rust release", "c", "e Rust again", "a", "d"]);
    }

    #[test]
    fn test_rank_without_preferences_keeps_order() {
        let cards = vec![card("x", "A"), card("y", "B")];
        let ranked = rank_by_preferences(cards, &prefs(&["world"], &[], &[]));
        assert_eq!(titles(&ranked), vec!["x", "y"]);
    }

    #[test]
    fn test_article_card_read_time_source() {
        let analyzer = crate::services::VaderAnalyzer;
        let long_title = "word ".repeat(300);

        let titled = article_card(
            &analyzer,
            Article {
                title: long_title.clone(),
                ..Article::default()
            },
        );
        assert_eq!(titled.read_minutes, 2);

        let described = article_card(
            &analyzer,
            Article {
                title: long_title,
                description: "<p>short <b>summary</b></p>".to_string(),
                ..Article::default()
            },
        );
        assert_eq!(described.read_minutes, 1);
    }

    #[test]
    fn test_search_limit() {
        assert_eq!(search_limit(None), 15);
        assert_eq!(search_limit(Some(1)), 5);
        assert_eq!(search_limit(Some(30)), 30);
        assert_eq!(search_limit(Some(500)), 50);
    }
}
