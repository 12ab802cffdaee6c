use anyhow::Context;

use super::print_card;
use crate::clients::build_shared_http_client;
use crate::clients::gnews::{GNewsClient, QueryOptions};
use crate::config::Config;
use crate::models::Topic;
use crate::services::news::search_limit;
use crate::services::{SentimentAnalyzer, VaderAnalyzer, article_card};

fn gnews(config: &Config) -> anyhow::Result<GNewsClient> {
    let http = build_shared_http_client(config.news.request_timeout_seconds)?;
    Ok(GNewsClient::with_shared_client(http, &config.news))
}

pub async fn cmd_headlines(
    config: &Config,
    topic: Option<&str>,
    max: Option<u32>,
) -> anyhow::Result<()> {
    let topic = topic
        .map(str::parse::<Topic>)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let articles = gnews(config)?
        .top_headlines(
            topic,
            &QueryOptions {
                max,
                ..QueryOptions::default()
            },
        )
        .await
        .context("Failed to fetch headlines")?;

    match topic {
        Some(t) => println!("Top {} headlines:", t.title()),
        None => println!("Top headlines:"),
    }
    println!("{:-<70}", "");

    if articles.is_empty() {
        println!("No articles found.");
    }
    for article in articles {
        print_card(&article_card(&VaderAnalyzer, article));
    }

    Ok(())
}

pub async fn cmd_search(
    config: &Config,
    query: &str,
    lang: Option<&str>,
    country: Option<&str>,
    max: Option<u32>,
) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Please enter a search term.");
    }

    println!("Searching for: {query}");

    let articles = gnews(config)?
        .search(
            query,
            &QueryOptions {
                lang,
                country,
                max: Some(search_limit(max)),
            },
        )
        .await
        .context("Search failed")?;

    if articles.is_empty() {
        println!("No articles found for '{query}'");
        return Ok(());
    }

    println!("{:-<70}", "");
    for article in articles {
        print_card(&article_card(&VaderAnalyzer, article));
    }

    Ok(())
}

pub fn cmd_sentiment(text: &str) {
    let sentiment = VaderAnalyzer.analyze(text);
    println!(
        "{} (compound {:+.3})",
        sentiment.label.as_str(),
        sentiment.score
    );
}
