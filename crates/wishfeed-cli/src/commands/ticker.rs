use wishfeed_core::config::FeedConfig;

use crate::commands::common::load_feed;
use crate::error::CliError;

pub async fn run_ticker(config: &FeedConfig) -> Result<(), CliError> {
    let feed = load_feed(config).await?;
    let mut ticker = feed.ticker();
    println!("{}", ticker.text());
    Ok(())
}
