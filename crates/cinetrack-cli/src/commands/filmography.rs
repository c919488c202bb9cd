use super::context::AppContext;
use super::progress::Spinner;
use crate::output::Output;
use cinetrack_core::{compose_filmography, CreditSort, FilmographyItem};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::json;

pub async fn run_filmography(person_id: u64, sort: CreditSort, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let projection = ctx.synchronizer().load().await?;

    let spinner = Spinner::start(format!("Fetching credits for person {}...", person_id));
    let credits = catalog.person_credits(person_id).await;
    spinner.finish();
    let credits = credits.map_err(|e| color_eyre::eyre::eyre!("Failed to fetch credits for person {}: {}", person_id, e))?;

    let items = compose_filmography(&credits, &projection, sort, &ctx.locale);

    if !output.is_human() {
        let rows: Vec<_> = items
            .iter()
            .map(|item| {
                json!({
                    "credit": item.credit,
                    "in_list": item.entry.is_some(),
                    "status": item.entry.and_then(|e| e.status),
                })
            })
            .collect();
        output.json(&json!({ "person_id": person_id, "credits": rows }));
        return Ok(());
    }

    output.header(format!("Filmography ({} credits)", items.len()));
    if items.is_empty() {
        output.info("No movie or series credits found.");
        return Ok(());
    }
    output.block(credits_table(&items));
    Ok(())
}

fn credits_table(items: &[FilmographyItem<'_>]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        ["Title", "Kind", "Date", "Character", "Vote", "In list"]
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );

    for item in items {
        let credit = item.credit;
        let in_list = match item.entry.and_then(|e| e.status) {
            Some(status) => Cell::new(status.as_str()).fg(Color::Green),
            None if item.entry.is_some() => Cell::new("yes").fg(Color::Green),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(&credit.title),
            Cell::new(credit.media_kind.as_str()),
            Cell::new(credit.release_date.as_deref().unwrap_or("")),
            Cell::new(credit.character.as_deref().unwrap_or("")),
            Cell::new(format!("{:.1}", credit.vote_average)),
            in_list,
        ]);
    }
    table
}
