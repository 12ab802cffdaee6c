use std::io::BufRead;

use anyhow::Context;

use crate::config::Config;
use crate::db::{DEFAULT_HISTORY_LIMIT, Store};
use crate::services::{AuthService, bookmarks_to_csv};
use crate::state::SharedState;

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
}

async fn find_user_id(store: &Store, username: &str) -> anyhow::Result<i32> {
    store
        .get_user_by_username(username)
        .await?
        .map(|u| u.id)
        .ok_or_else(|| anyhow::anyhow!("User '{username}' not found"))
}

pub async fn cmd_user_create(config: Config, username: &str, email: &str) -> anyhow::Result<()> {
    eprintln!("Password for {username}:");
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;
    let password = password.trim_end_matches(['\r', '\n']);

    let state = SharedState::new(config).await?;
    let user = state
        .auth_service
        .register(username, email, password)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!("Account created for {} (id {}).", user.username, user.id);
    Ok(())
}

pub async fn cmd_bookmarks(config: &Config, username: &str, csv: bool) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let user_id = find_user_id(&store, username).await?;
    let saved = store.get_saved_articles(user_id).await?;

    if csv {
        print!("{}", bookmarks_to_csv(&saved));
        return Ok(());
    }

    if saved.is_empty() {
        println!("No saved articles.");
        return Ok(());
    }

    println!("Saved articles ({}):", saved.len());
    println!("{:-<70}", "");
    for article in saved {
        println!("• {}", article.title);
        println!("  {} | saved {}", article.source, article.saved_at);
        println!("  {}", article.url);
    }

    Ok(())
}

pub async fn cmd_history(config: &Config, username: &str, limit: u64) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let user_id = find_user_id(&store, username).await?;
    let limit = if limit == 0 { DEFAULT_HISTORY_LIMIT } else { limit };
    let entries = store.get_search_history(user_id, limit).await?;

    if entries.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    println!("Recent searches (last {}):", entries.len());
    println!("{:-<70}", "");
    for entry in entries {
        println!("• {}  ({})", entry.query, entry.created_at);
    }

    Ok(())
}
