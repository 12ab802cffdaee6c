//! CLI module - Command-line interface for News Pulse
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// News Pulse - personalized news with sentiment and article chat
#[derive(Parser)]
#[command(name = "newspulse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web API until Ctrl+C
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Print top headlines
    #[command(alias = "top")]
    Headlines {
        /// Topic such as technology or sports
        #[arg(long, short)]
        topic: Option<String>,
        /// Number of articles
        #[arg(long, short)]
        max: Option<u32>,
    },

    /// Search articles
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Language code, e.g. en
        #[arg(long)]
        lang: Option<String>,
        /// Country code, e.g. in
        #[arg(long)]
        country: Option<String>,
        /// Number of articles (5-50)
        #[arg(long)]
        max: Option<u32>,
    },

    /// Score the sentiment of some text
    Sentiment {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// List a user's saved articles
    #[command(alias = "saved")]
    Bookmarks {
        username: String,
        /// Print CSV instead of a list
        #[arg(long)]
        csv: bool,
    },

    /// Show a user's recent searches
    #[command(alias = "h")]
    History {
        username: String,
        /// Number of entries to show
        #[arg(default_value = "20")]
        limit: u64,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account; the password is read from stdin
    Create { username: String, email: String },
}

pub use commands::*;
