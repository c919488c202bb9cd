use super::context::AppContext;
use super::progress::{is_interactive, Spinner};
use super::prompts;
use crate::output::Output;
use cinetrack_core::{SeasonCheckReport, SeasonNotification};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::warn;

/// What to do with each detected new season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptMode {
    Ask,
    All,
    None,
}

pub async fn run_check(mode: AcceptMode, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    if !ctx.config.season_watch.enabled {
        output.warn("Season check is disabled in configuration (season_watch.enabled = false)");
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let watcher = ctx.season_watcher(tx)?;

    let spinner = Spinner::start("Checking completed series for new seasons...");
    let report = watcher.run().await;
    spinner.finish();
    let report = report.map_err(|e| color_eyre::eyre::eyre!("Season check failed: {}", e))?;
    drop(watcher);

    let mut notifications = Vec::new();
    while let Some(notification) = rx.recv().await {
        notifications.push(notification);
    }

    let mode = if mode == AcceptMode::Ask && (!is_interactive() || !output.is_human()) {
        AcceptMode::None
    } else {
        mode
    };

    let mut accepted = 0;
    for notification in &notifications {
        announce(notification, output);
        if decide(notification, mode)? {
            match notification.accept.invoke().await {
                Ok(()) => {
                    accepted += 1;
                    output.success(format!("'{}' moved back to planned", notification.title));
                }
                Err(e) => {
                    warn!(operation = "season_accept", catalog_id = notification.catalog_id, "Accept failed: {}", e);
                    output.error(format!("Could not update '{}': {}", notification.title, e));
                }
            }
        }
    }

    print_report(&report, accepted, output);
    Ok(())
}

fn decide(notification: &SeasonNotification, mode: AcceptMode) -> Result<bool> {
    match mode {
        AcceptMode::All => Ok(true),
        AcceptMode::None => Ok(false),
        AcceptMode::Ask => prompts::prompt_yes_no(
            &format!("Add '{}' back to your planned list?", notification.title),
            Some(true),
        ),
    }
}

pub fn announce(notification: &SeasonNotification, output: &Output) {
    if output.is_human() {
        output.info(format!(
            "{} {} has a new season ({} → {})",
            "★".yellow(),
            notification.title.bold(),
            notification.previous_season_count,
            notification.new_season_count
        ));
    } else {
        output.json(&json!({
            "type": "new_season",
            "catalog_id": notification.catalog_id,
            "title": notification.title,
            "previous_season_count": notification.previous_season_count,
            "new_season_count": notification.new_season_count,
        }));
    }
}

fn print_report(report: &SeasonCheckReport, accepted: usize, output: &Output) {
    if !output.is_human() {
        output.json(&json!({ "type": "season_check", "report": report, "accepted": accepted }));
        return;
    }

    if report.skipped {
        output.info(format!("Season check already ran today ({})", report.day));
        return;
    }
    output.success(format!(
        "Checked {} series: {} new, {} unchanged, {} baselined, {} failed",
        report.candidates, report.notified, report.unchanged, report.baselined, report.failed
    ));
    if report.failed > 0 {
        output.warn("Some series could not be checked; they will be retried tomorrow");
    }
}
