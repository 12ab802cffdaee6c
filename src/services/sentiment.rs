//! Sentiment scoring backed by the VADER lexicon.

use std::sync::LazyLock;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::{Article, Sentiment};

static VADER: LazyLock<SentimentIntensityAnalyzer> = LazyLock::new(SentimentIntensityAnalyzer::new);

pub trait SentimentAnalyzer: Send + Sync {
    /// Compound polarity score in [-1, 1].
    fn compound(&self, text: &str) -> f64;

    fn analyze(&self, text: &str) -> Sentiment {
        if text.trim().is_empty() {
            return Sentiment::NEUTRAL;
        }
        Sentiment::from_compound(self.compound(text))
    }

    fn analyze_article(&self, article: &Article) -> Sentiment {
        self.analyze(&article.headline_text())
    }
}

/// Shares one lexicon for the life of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderAnalyzer;

impl SentimentAnalyzer for VaderAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        VADER
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(VaderAnalyzer.analyze(""), Sentiment::NEUTRAL);
        assert_eq!(VaderAnalyzer.analyze("   \n"), Sentiment::NEUTRAL);
    }

    #[test]
    fn test_polarity() {
        let good = VaderAnalyzer.analyze("What a great, wonderful and happy day!");
        assert_eq!(good.label, SentimentLabel::Positive);
        assert!(good.score > 0.5);

        let bad = VaderAnalyzer.analyze("A terrible, horrible disaster. Awful.");
        assert_eq!(bad.label, SentimentLabel::Negative);
        assert!(bad.score < -0.5);
    }

    struct Fixed(f64);

    impl SentimentAnalyzer for Fixed {
        fn compound(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_labels_follow_compound_score() {
        assert_eq!(Fixed(0.2).analyze("x").label, SentimentLabel::Positive);
        assert_eq!(Fixed(0.0).analyze("x").label, SentimentLabel::Neutral);
        assert_eq!(Fixed(-0.3).analyze("x").label, SentimentLabel::Negative);
    }
}
