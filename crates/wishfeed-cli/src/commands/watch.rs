use tokio::io::{AsyncBufReadExt, BufReader};
use wishfeed_core::config::FeedConfig;
use wishfeed_core::state::SyncState;
use wishfeed_core::{SubmitError, WishFeed};

use crate::commands::common::{format_notification, format_wish_lines};
use crate::error::CliError;

pub async fn run_watch(ticker_mode: bool, limit: usize, config: &FeedConfig) -> Result<(), CliError> {
    let feed = WishFeed::connect(config)?;
    let poller = feed.start();
    let mut status = feed.synchronizer().subscribe();
    let mut notifications = feed.notifications().subscribe();
    let mut ticker = feed.ticker();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut rendered_version = None;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    eprintln!(
        "Type `name: message` and press Enter to leave a wish. Enter alone dismisses a notice. Ctrl-C to quit."
    );

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status.borrow_and_update();
                if current.state == SyncState::Error {
                    eprintln!("(offline, retrying in {:?})", config.poll_interval);
                }
            }
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }
                let shown = notifications.borrow_and_update().clone();
                if let Some(notification) = shown {
                    println!("{}", format_notification(&notification));
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => handle_line(&feed, &line),
                    None => stdin_open = false,
                }
            }
        }

        let version = feed.store().version();
        if rendered_version != Some(version) {
            rendered_version = Some(version);
            if ticker_mode {
                println!("{}", ticker.text());
            } else {
                render_list(&feed, limit);
            }
        }
    }

    poller.stop().await;
    Ok(())
}

/// Split `name: message` input
pub fn parse_wish_line(line: &str) -> Option<(String, String)> {
    let (name, message) = line.split_once(':')?;
    Some((name.trim().to_string(), message.trim().to_string()))
}

/// A bare Enter dismisses the current notification; anything else is a wish
pub fn handle_line(feed: &WishFeed, line: &str) {
    if line.trim().is_empty() {
        feed.notifications().dismiss();
        return;
    }
    let Some((name, message)) = parse_wish_line(line) else {
        eprintln!("Write your wish as `name: message`");
        return;
    };

    let submissions = feed.submissions().clone();
    tokio::spawn(async move {
        match submissions.submit(&name, &message).await {
            Ok(_) => {}
            Err(SubmitError::Busy) => eprintln!("Still sending your previous wish..."),
            Err(error) => eprintln!("{error}"),
        }
    });
}

fn render_list(feed: &WishFeed, limit: usize) {
    let records = feed.store().snapshot();
    println!("--- {} wishes ---", records.len());
    let shown = records.into_iter().take(limit).collect::<Vec<_>>();
    for line in format_wish_lines(&shown) {
        println!("{line}");
    }
}
