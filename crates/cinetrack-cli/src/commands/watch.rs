use super::context::AppContext;
use super::seasons::announce;
use super::stats::print_stats;
use crate::logging;
use crate::output::Output;
use cinetrack_config::PathManager;
use cinetrack_core::aggregate;
use color_eyre::Result;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

pub async fn run_watch(verbose: u8, quiet: bool, no_startup_check: bool, output: &Output) -> Result<()> {
    let log_file = PathManager::default().watch_log_file();
    logging::init_logging_with_file(verbose, quiet, Some(log_file.clone()))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to initialize logging: {}", e))?;
    output.info(format!("Logging to {}", log_file.display()));

    let ctx = AppContext::load()?;
    let settings = &ctx.config.season_watch;

    let (tx, mut notifications) = mpsc::unbounded_channel();
    let watcher = if settings.enabled {
        match ctx.season_watcher(tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(operation = "watch_start", "Season check disabled: {}", e);
                output.warn(format!("Season check disabled: {}", e));
                None
            }
        }
    } else {
        info!(operation = "watch_start", "Season check disabled in configuration");
        None
    };

    let mut ticker = tokio::time::interval(settings.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    if no_startup_check || !settings.run_on_startup {
        // The first tick fires immediately
        ticker.tick().await;
    }

    let synchronizer = ctx.synchronizer();
    let mut stream = synchronizer.subscribe().await?;
    info!(
        operation = "watch_start",
        owner_id = synchronizer.session().owner_id(),
        poll_interval_minutes = settings.poll_interval_minutes,
        season_check = watcher.is_some(),
        "Watching list"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut result = Ok(());
    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(projection)) => {
                    info!(operation = "list_snapshot", entries = projection.len(), "List changed");
                    print_stats(&aggregate(&projection), output);
                }
                Some(Err(e)) => {
                    error!(operation = "list_subscription_error", error = %e, "List subscription ended");
                    result = Err(color_eyre::eyre::eyre!("List subscription ended: {}", e));
                    break;
                }
                None => break,
            },
            _ = ticker.tick(), if watcher.is_some() => {
                if let Some(watcher) = &watcher {
                    if let Err(e) = watcher.run().await {
                        error!(operation = "season_check_error", error = %e, "Season check failed, will retry on next tick");
                    }
                }
            }
            Some(notification) = notifications.recv() => {
                info!(
                    operation = "season_notification",
                    catalog_id = notification.catalog_id,
                    new_season_count = notification.new_season_count,
                    "New season available"
                );
                announce(&notification, output);
            }
            _ = &mut shutdown => {
                info!(operation = "watch_stop", "Received interrupt, shutting down");
                break;
            }
        }
    }

    stream.unsubscribe();
    result
}
