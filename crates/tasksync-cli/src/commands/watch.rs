//! Live notification stream.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use tasksync_client::{ApiClient, ClientConfig, PushChannel};
use tasksync_core::notify::model::EventKind;
use tasksync_core::notify::NotificationCenter;
use tasksync_core::session::SessionStore;
use tasksync_core::task::TaskList;

use crate::output;

#[derive(Args)]
pub struct WatchArgs {
    /// Re-fetch the task list when a task event arrives
    #[arg(long)]
    pub refresh: bool,
}

pub async fn execute(args: WatchArgs, config: &ClientConfig, store: &SessionStore) -> Result<()> {
    let session = super::signed_in(store)?;
    let api = ApiClient::new(config).with_token(&session.token);

    let channel = PushChannel::new(&config.socket_url);
    let mut rx = channel.subscribe();
    channel.connect(&session.token).await?;

    let mut center = NotificationCenter::new();
    let mut list = if args.refresh {
        let mut list = TaskList::new();
        list.load(super::task::fetch_snapshot(&api, session).await?);
        Some(list)
    } else {
        None
    };

    println!(
        "{} Watching for notifications as {} {}",
        "●".green(),
        session.user.name.cyan(),
        "(Ctrl-C to stop)".dimmed()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Ok(event) => {
                    let now = Utc::now();
                    match center.on_event(&event, now).cloned() {
                        Some(record) => output::print_notification(&record, center.unread_count(), now),
                        None => debug!("duplicate notification dropped"),
                    }
                    if let Some(list) = list.as_mut() {
                        if event.kind() != EventKind::TaskOverdue {
                            match super::task::fetch_snapshot(&api, session).await {
                                Ok(tasks) => {
                                    list.load(tasks);
                                    output::print_stats_line(&list.stats(now));
                                }
                                Err(e) => warn!(error = %e, "task refresh failed"),
                            }
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    channel.disconnect().await;
    center.clear();
    println!();
    println!("{} Stopped watching", "✓".green().bold());
    Ok(())
}
