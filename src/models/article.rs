use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const WORDS_PER_MINUTE: usize = 200;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// A news article normalized from the upstream API shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub image_url: String,
    pub published_at: String,
    pub source: String,
}

impl Article {
    /// Text used for sentiment scoring: `"{title}. {description}"`.
    #[must_use]
    pub fn headline_text(&self) -> String {
        format!("{}. {}", self.title, plain_text(&self.description))
    }

    /// Title and description, as handed to the chat model.
    #[must_use]
    pub fn context_text(&self) -> String {
        format!("{}\n\n{}", self.title, plain_text(&self.description))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// VADER compound score in [-1, 1]
    pub score: f64,
}

impl Sentiment {
    pub const NEUTRAL: Self = Self {
        label: SentimentLabel::Neutral,
        score: 0.0,
    };

    /// Labels a compound score with the usual ±0.05 thresholds.
    #[must_use]
    pub const fn from_compound(score: f64) -> Self {
        let label = if score >= 0.05 {
            SentimentLabel::Positive
        } else if score <= -0.05 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self { label, score }
    }
}

/// An article as presented to a reader.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleCard {
    #[serde(flatten)]
    pub article: Article,
    pub sentiment: Sentiment,
    pub read_minutes: usize,
}

/// Rough read time at 200 words per minute, never less than a minute.
#[must_use]
pub fn estimate_read_time(text: &str) -> usize {
    let words = WORD_RE.find_iter(text).count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Flattens HTML fragments that some sources put in descriptions.
#[must_use]
pub fn plain_text(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    html2text::from_read(text.as_bytes(), 80).map_or_else(
        |_| text.to_string(),
        |flat| flat.split_whitespace().collect::<Vec<_>>().join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_read_time() {
        assert_eq!(estimate_read_time(""), 1);
        assert_eq!(estimate_read_time("just a few words"), 1);
        assert_eq!(estimate_read_time(&"word ".repeat(200)), 1);
        assert_eq!(estimate_read_time(&"word ".repeat(201)), 2);
        assert_eq!(estimate_read_time(&"word ".repeat(650)), 4);
    }

    #[test]
    fn test_sentiment_thresholds() {
        assert_eq!(Sentiment::from_compound(0.05).label, SentimentLabel::Positive);
        assert_eq!(Sentiment::from_compound(0.049).label, SentimentLabel::Neutral);
        assert_eq!(Sentiment::from_compound(-0.049).label, SentimentLabel::Neutral);
        assert_eq!(Sentiment::from_compound(-0.05).label, SentimentLabel::Negative);
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(plain_text("No markup here"), "No markup here");
    }

    #[test]
    fn test_plain_text_strips_tags() {
        let flat = plain_text("<p>Markets <b>rally</b> today</p>");
        assert!(flat.contains("Markets"));
        assert!(flat.contains("rally"));
        assert!(!flat.contains("<b>"));
    }

    #[test]
    fn test_card_serializes_flat() {
        let card = ArticleCard {
            article: Article {
                title: "Title".to_string(),
                url: "https://example.com/a".to_string(),
                ..Article::default()
            },
            sentiment: Sentiment::NEUTRAL,
            read_minutes: 1,
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["title"], "Title");
        assert_eq!(json["sentiment"]["label"], "neutral");
        assert_eq!(json["read_minutes"], 1);
    }
}
