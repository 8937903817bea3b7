use wishfeed_core::config::FeedConfig;
use wishfeed_core::{SubmitOutcome, WishFeed};

use crate::commands::common::{format_notification, resolve_message};
use crate::error::CliError;

pub async fn run_send(name: &str, message: &[String], config: &FeedConfig) -> Result<(), CliError> {
    let feed = WishFeed::connect(config)?;
    let message = resolve_message(message);
    let outcome = feed.submissions().submit(name, &message).await?;

    if let Some(notification) = feed.notifications().current() {
        println!("{}", format_notification(&notification));
    }

    match outcome {
        SubmitOutcome::Confirmed(record) | SubmitOutcome::Ambiguous { record, .. } => {
            println!("{}", record.id);
            Ok(())
        }
        SubmitOutcome::Rejected { reason, .. } => Err(CliError::Rejected(reason)),
    }
}
