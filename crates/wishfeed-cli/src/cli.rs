use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wishfeed")]
#[command(about = "Leave wishes in the guestbook and follow the live feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the wish store (overrides WISHFEED_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current feed
    List {
        /// Number of wishes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Leave a wish
    #[command(alias = "wish")]
    Send {
        /// Your name
        #[arg(short, long)]
        name: String,
        /// Wish text
        message: Vec<String>,
    },
    /// Follow the feed, refreshing on the poll interval
    Watch {
        /// Show the scrolling ticker line instead of the list
        #[arg(long)]
        ticker: bool,
        /// Number of wishes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Print the ticker line once
    Ticker,
}
