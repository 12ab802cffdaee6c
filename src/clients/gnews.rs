use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::NewsConfig;
use crate::models::{Article, Topic};

/// Upper bound GNews accepts for `max`.
pub const MAX_RESULTS_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum GNewsError {
    #[error("Missing GNEWS_API_KEY. Set it in the environment or a .env file.")]
    MissingApiKey,

    #[error("GNews API error: status {status} -> {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    name: Option<String>,
}

impl From<GNewsArticle> for Article {
    fn from(a: GNewsArticle) -> Self {
        Self {
            title: a.title.unwrap_or_default(),
            description: a.description.unwrap_or_default(),
            content: a.content.unwrap_or_default(),
            url: a.url.unwrap_or_default(),
            image_url: a.image.unwrap_or_default(),
            published_at: a.published_at.unwrap_or_default(),
            source: a.source.and_then(|s| s.name).unwrap_or_default(),
        }
    }
}

/// Language/country/count overrides for a single request.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions<'a> {
    pub lang: Option<&'a str>,
    pub country: Option<&'a str>,
    pub max: Option<u32>,
}

#[derive(Clone)]
pub struct GNewsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    default_language: String,
    default_country: String,
    default_max: u32,
    timeout: Duration,
}

impl GNewsClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &NewsConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            default_language: config.default_language.clone(),
            default_country: config.default_country.clone(),
            default_max: config.max_results,
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        opts: &QueryOptions<'_>,
    ) -> Result<Vec<Article>, GNewsError> {
        let mut params = self.base_params(opts);
        params.push(("q", query.to_string()));
        self.request("search", params).await
    }

    pub async fn top_headlines(
        &self,
        topic: Option<Topic>,
        opts: &QueryOptions<'_>,
    ) -> Result<Vec<Article>, GNewsError> {
        let mut params = self.base_params(opts);
        if let Some(topic) = topic {
            params.push(("topic", topic.as_str().to_string()));
        }
        self.request("top-headlines", params).await
    }

    fn base_params(&self, opts: &QueryOptions<'_>) -> Vec<(&'static str, String)> {
        let max = opts.max.unwrap_or(self.default_max).clamp(1, MAX_RESULTS_LIMIT);
        vec![
            (
                "lang",
                opts.lang.unwrap_or(&self.default_language).to_string(),
            ),
            (
                "country",
                opts.country.unwrap_or(&self.default_country).to_string(),
            ),
            ("max", max.to_string()),
        ]
    }

    async fn request(
        &self,
        endpoint: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<Vec<Article>, GNewsError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GNewsError::MissingApiKey)?;

        debug!(endpoint, ?params, "Querying GNews");
        // The key rides in the query string, so request errors drop their URL.
        params.push(("apikey", api_key.to_string()));

        let response = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GNewsError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let data: GNewsResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;
        metrics::counter!("gnews_articles_fetched_total").increment(data.articles.len() as u64);

        Ok(data.articles.into_iter().map(Article::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_article() {
        let raw = r#"{
            "title": "Launch",
            "description": "Rocket lifts off",
            "url": "https://n.io/launch",
            "image": "https://n.io/launch.jpg",
            "publishedAt": "2025-01-02T03:04:05Z",
            "source": {"name": "Space Daily", "url": "https://n.io"}
        }"#;

        let article: Article = serde_json::from_str::<GNewsArticle>(raw).unwrap().into();
        assert_eq!(article.title, "Launch");
        assert_eq!(article.image_url, "https://n.io/launch.jpg");
        assert_eq!(article.published_at, "2025-01-02T03:04:05Z");
        assert_eq!(article.source, "Space Daily");
        assert_eq!(article.content, "");
    }

    #[test]
    fn test_normalize_handles_nulls() {
        let raw = r#"{"title": null, "source": null}"#;
        let article: Article = serde_json::from_str::<GNewsArticle>(raw).unwrap().into();
        assert_eq!(article, Article::default());
    }

    #[test]
    fn test_max_is_clamped() {
        let client = GNewsClient::with_shared_client(Client::new(), &NewsConfig::default());

        let params = client.base_params(&QueryOptions {
            max: Some(500),
            ..QueryOptions::default()
        });
        assert!(params.contains(&("max", "100".to_string())));

        let params = client.base_params(&QueryOptions {
            max: Some(0),
            lang: Some("hi"),
            country: None,
        });
        assert!(params.contains(&("max", "1".to_string())));
        assert!(params.contains(&("lang", "hi".to_string())));
        assert!(params.contains(&("country", "in".to_string())));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = GNewsClient::with_shared_client(Client::new(), &NewsConfig::default());
        let err = client
            .search("rust", &QueryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GNewsError::MissingApiKey));
        assert!(err.to_string().contains("GNEWS_API_KEY"));
    }

    #[tokio::test]
    async fn test_connection_error_hides_key() {
        let config = NewsConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: Some("topsecret-key".to_string()),
            ..NewsConfig::default()
        };
        let client = GNewsClient::with_shared_client(Client::new(), &config);

        let err = client
            .top_headlines(Some(Topic::World), &QueryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GNewsError::Network(_)));
        assert!(!err.to_string().contains("topsecret-key"));
        assert!(!format!("{err:?}").contains("topsecret-key"));
    }
}
