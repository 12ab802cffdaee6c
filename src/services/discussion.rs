//! Per-article chat, question suggestions and summaries.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::clients::gemini::{GeminiClient, GeminiError, Turn};
use crate::db::{ChatMessage, Store};
use crate::models::{Article, plain_text};

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// Number of questions requested from the model.
pub const SUGGESTED_QUESTIONS: usize = 3;

/// Prior messages replayed to the model on each question.
const MAX_HISTORY_TURNS: usize = 20;

#[derive(Debug, Error)]
pub enum DiscussionError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] GeminiError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DiscussionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub conversation_id: i32,
    pub answer: String,
    /// True when `answer` holds an error message rather than model output.
    pub failed: bool,
}

pub struct DiscussionService {
    store: Store,
    gemini: GeminiClient,
}

impl DiscussionService {
    #[must_use]
    pub const fn new(store: Store, gemini: GeminiClient) -> Self {
        Self { store, gemini }
    }

    pub async fn transcript(
        &self,
        user_id: i32,
        article_url: &str,
    ) -> Result<Vec<ChatMessage>, DiscussionError> {
        Ok(self
            .store
            .get_messages_for_article(user_id, article_url.trim())
            .await?)
    }

    /// Asks a question about `article`. Both sides of the exchange are stored,
    /// including the error text when the model call fails.
    pub async fn ask(
        &self,
        user_id: i32,
        article: &Article,
        question: &str,
    ) -> Result<Answer, DiscussionError> {
        let url = article.url.trim();
        let question = question.trim();
        if url.is_empty() {
            return Err(DiscussionError::Validation("Article URL is required.".to_string()));
        }
        if question.is_empty() {
            return Err(DiscussionError::Validation("Please type a question.".to_string()));
        }

        let history = self.store.get_messages_for_article(user_id, url).await?;

        let conversation_id = match self.store.find_conversation(user_id, url).await? {
            Some(id) => id,
            None => self.store.create_conversation(user_id, url).await?,
        };
        self.store
            .save_message(conversation_id, ROLE_USER, question)
            .await?;

        let system = system_prompt(article);
        let turns = build_turns(&history, question);
        debug!(conversation_id, turns = turns.len(), model = self.gemini.model(), "Asking Gemini");

        let (answer, failed) = match self.gemini.generate_turns(Some(&system), &turns).await {
            Ok(text) => (text, false),
            Err(e) => {
                warn!(conversation_id, error = %e, "Gemini call failed");
                (format!("Gemini call failed: {e}"), true)
            }
        };

        self.store
            .save_message(conversation_id, ROLE_ASSISTANT, &answer)
            .await?;

        Ok(Answer {
            conversation_id,
            answer,
            failed,
        })
    }

    pub async fn suggest_questions(&self, article: &Article) -> Result<Vec<String>, DiscussionError> {
        let text = article_text(article)?;
        let prompt = format!(
            "Generate {SUGGESTED_QUESTIONS} clear, concise, thought-provoking questions based on \
             the following article:\n\n{text}\n\nReturn each question on a separate line."
        );

        let reply = self.gemini.generate(&prompt).await?;
        Ok(parse_questions(&reply))
    }

    pub async fn summarize(&self, article: &Article) -> Result<String, DiscussionError> {
        let text = article_text(article)?;
        let prompt =
            format!("Summarize the following news article in a concise paragraph:\n\n{text}");
        Ok(self.gemini.generate(&prompt).await?)
    }
}

/// Full content when the source provides it, otherwise title and description.
fn article_text(article: &Article) -> Result<String, DiscussionError> {
    let content = plain_text(&article.content);
    let text = if content.trim().is_empty() {
        article.context_text()
    } else {
        format!("{}\n\n{}", article.title, content)
    };

    if text.trim().is_empty() {
        return Err(DiscussionError::Validation("Article has no text.".to_string()));
    }
    Ok(text)
}

fn system_prompt(article: &Article) -> String {
    format!(
        "You are a helpful assistant. Use the article below as the source. Answer the user's \
         question succinctly and clearly. If you do not know, say you don't know.\n\n\
         Article:\n{}",
        article.context_text()
    )
}

fn build_turns(history: &[ChatMessage], question: &str) -> Vec<Turn> {
    let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
    history
        .iter()
        .skip(skip)
        .map(|m| {
            if m.role == ROLE_ASSISTANT {
                Turn::model(m.content.clone())
            } else {
                Turn::user(m.content.clone())
            }
        })
        .chain(std::iter::once(Turn::user(question)))
        .collect()
}

/// One question per non-empty line, with list markers removed.
#[must_use]
pub fn parse_questions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | '*' | '•')
                })
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
