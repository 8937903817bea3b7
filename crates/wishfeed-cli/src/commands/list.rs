use wishfeed_core::config::FeedConfig;

use crate::commands::common::{format_wish_lines, load_feed, wish_to_list_item, WishListItem};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, config: &FeedConfig) -> Result<(), CliError> {
    let feed = load_feed(config).await?;
    let records = feed
        .store()
        .snapshot()
        .into_iter()
        .take(limit)
        .collect::<Vec<_>>();

    if as_json {
        let json_items = records
            .iter()
            .map(wish_to_list_item)
            .collect::<Vec<WishListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if records.is_empty() {
        println!("No wishes yet.");
    } else {
        for line in format_wish_lines(&records) {
            println!("{line}");
        }
    }

    Ok(())
}
