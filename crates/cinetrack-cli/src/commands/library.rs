use super::context::AppContext;
use crate::output::Output;
use cinetrack_core::{compose, compose_shared, LibraryFilter, SortKey};
use cinetrack_models::{ListEntry, MediaKind, WatchStatus};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_list(filter: LibraryFilter, sort: SortKey, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let projection = ctx.synchronizer().load().await?;
    let view = compose(&projection, &filter, sort, &ctx.locale);

    if !output.is_human() {
        output.json(&json!({
            "owner_id": ctx.config.session.owner_id,
            "total": projection.len(),
            "shown": view.len(),
            "entries": view,
        }));
        return Ok(());
    }

    output.header(format!("My List ({} of {})", view.len(), projection.len()));
    if view.is_empty() {
        output.info("No entries match.".bright_black().to_string());
        return Ok(());
    }
    output.block(entries_table(&view));
    Ok(())
}

pub async fn run_shared(owner_id: &str, kind: Option<MediaKind>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let projection = ctx.synchronizer().fetch_shared(owner_id).await?;
    let view = compose_shared(&projection, kind, &ctx.locale);

    if !output.is_human() {
        output.json(&json!({
            "owner_id": owner_id,
            "shown": view.len(),
            "entries": view,
        }));
        return Ok(());
    }

    output.header(format!("List of {} ({})", owner_id, view.len()));
    if view.is_empty() {
        output.info("This list is empty.".bright_black().to_string());
        return Ok(());
    }
    output.block(entries_table(&view));
    Ok(())
}

fn entries_table(entries: &[&ListEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        ["Title", "Year", "Kind", "Status", "Score", "Progress", "Fav"]
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.title),
            Cell::new(entry.release_year()),
            Cell::new(entry.media_kind.as_str()),
            status_cell(entry),
            Cell::new(entry.score.map(|s| s.to_string()).unwrap_or_default()),
            Cell::new(progress_label(entry)),
            Cell::new(if entry.is_favorite { "★" } else { "" }).fg(Color::Yellow),
        ]);
    }
    table
}

fn status_cell(entry: &ListEntry) -> Cell {
    match entry.status {
        Some(status) => {
            let color = match status {
                WatchStatus::Watching => Color::Green,
                WatchStatus::Planned => Color::Blue,
                WatchStatus::Completed => Color::Grey,
                WatchStatus::Dropped => Color::Red,
            };
            Cell::new(status.as_str()).fg(color)
        }
        None => Cell::new("-"),
    }
}

pub(crate) fn progress_label(entry: &ListEntry) -> String {
    if !entry.is_series() {
        return String::new();
    }
    let mut label = match (entry.current_season, entry.current_episode) {
        (Some(season), Some(episode)) => format!("S{}E{}", season, episode),
        (Some(season), None) => format!("S{}", season),
        _ => String::new(),
    };
    if entry.total_seasons > 0 {
        if !label.is_empty() {
            label.push(' ');
        }
        label.push_str(&format!("/ {} seasons", entry.total_seasons));
    }
    label
}
