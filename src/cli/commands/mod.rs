mod account;
mod news;

pub use account::{cmd_bookmarks, cmd_history, cmd_user_create};
pub use news::{cmd_headlines, cmd_search, cmd_sentiment};

use crate::models::ArticleCard;

fn print_card(card: &ArticleCard) {
    let a = &card.article;
    println!("• {}", a.title);
    if !a.source.is_empty() || !a.published_at.is_empty() {
        println!("  {} | {}", a.source, a.published_at);
    }
    println!(
        "  {} ({:+.2}) | {} min read",
        card.sentiment.label.as_str(),
        card.sentiment.score,
        card.read_minutes
    );
    if !a.url.is_empty() {
        println!("  {}", a.url);
    }
    println!();
}
