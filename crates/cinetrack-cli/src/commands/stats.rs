use super::context::AppContext;
use crate::output::Output;
use cinetrack_core::{aggregate, StatsSnapshot};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use serde_json::json;

pub async fn run_stats(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let projection = ctx.synchronizer().load().await?;
    print_stats(&aggregate(&projection), output);
    Ok(())
}

pub fn print_stats(stats: &StatsSnapshot, output: &Output) {
    if !output.is_human() {
        let (days, hours) = stats.watch_time();
        output.json(&json!({
            "type": "stats",
            "stats": stats,
            "watch_time": { "days": days, "hours": hours },
        }));
        return;
    }

    output.header("Statistics");
    output.block(summary_table(stats));

    if !stats.genre_histogram.is_empty() {
        let mut genres = styled_table(["Genre", "Count"]);
        for genre in &stats.genre_histogram {
            genres.add_row(vec![
                Cell::new(&genre.name),
                Cell::new(genre.count).set_alignment(CellAlignment::Right),
            ]);
        }
        output.block(genres);
    }

    let mut statuses = styled_table(["Status", "Count"]);
    for bucket in &stats.status_histogram {
        statuses.add_row(vec![
            Cell::new(bucket.status.as_str()),
            Cell::new(bucket.count).set_alignment(CellAlignment::Right),
        ]);
    }
    output.block(statuses);
}

fn summary_table(stats: &StatsSnapshot) -> Table {
    let (days, hours) = stats.watch_time();
    let average = if stats.average_score > 0.0 {
        format!("{:.1}", stats.average_score)
    } else {
        "-".to_string()
    };

    let mut table = styled_table(["Metric", "Value"]);
    table.add_row(vec![Cell::new("Movies watched"), Cell::new(stats.completed_movie_count)]);
    table.add_row(vec![
        Cell::new("Series watching or finished"),
        Cell::new(stats.active_or_completed_series_count),
    ]);
    table.add_row(vec![Cell::new("Episodes watched"), Cell::new(stats.total_watched_episodes)]);
    table.add_row(vec![Cell::new("Time watched"), Cell::new(format!("{}d {}h", days, hours))]);
    table.add_row(vec![Cell::new("Average score"), Cell::new(average)]);
    table
}

fn styled_table(header: [&str; 2]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );
    table
}
