use super::context::AppContext;
use super::progress::Spinner;
use crate::output::Output;
use cinetrack_core::{choose_seed, random_pick, recommendations_for, Projection, RECOMMENDATION_MIN_SCORE};
use cinetrack_models::{MediaKind, SearchResult};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_search(query: &str, kind: Option<MediaKind>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let projection = ctx.synchronizer().load().await?;

    let spinner = Spinner::start(format!("Searching for '{}'...", query));
    let results = catalog.search(query).await;
    spinner.finish();
    let mut results = results.map_err(|e| color_eyre::eyre::eyre!("Search for '{}' failed: {}", query, e))?;
    if let Some(kind) = kind {
        results.retain(|r| r.media_kind == kind);
    }

    if !output.is_human() {
        output.json(&json!({ "query": query, "results": result_rows(&results, &projection) }));
        return Ok(());
    }

    output.header(format!("Results for '{}' ({})", query, results.len()));
    if results.is_empty() {
        output.info("Nothing found.".bright_black().to_string());
        return Ok(());
    }
    output.block(results_table(&results, &projection));
    Ok(())
}

pub async fn run_recommend(kind: MediaKind, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let projection = ctx.synchronizer().load().await?;

    let seed = {
        let mut rng = rand::thread_rng();
        choose_seed(&projection, kind, &mut rng)
    };
    let Some(seed) = seed else {
        output.warn(format!(
            "Add a {} you scored {} or more, or are watching, to get recommendations",
            kind, RECOMMENDATION_MIN_SCORE
        ));
        return Ok(());
    };

    let spinner = Spinner::start(format!("Finding titles like '{}'...", seed.title));
    let results = recommendations_for(catalog.as_ref(), seed).await;
    spinner.finish();
    let results = results.map_err(|e| color_eyre::eyre::eyre!("Failed to fetch recommendations: {}", e))?;

    if !output.is_human() {
        output.json(&json!({
            "seed": { "catalog_id": seed.catalog_id, "title": seed.title },
            "results": result_rows(&results, &projection),
        }));
        return Ok(());
    }

    output.header(format!("Because you liked '{}' ({})", seed.title, results.len()));
    if results.is_empty() {
        output.info("The catalog has no recommendations for it.".bright_black().to_string());
        return Ok(());
    }
    output.block(results_table(&results, &projection));
    Ok(())
}

pub async fn run_pick(kind: MediaKind, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let projection = ctx.synchronizer().load().await?;

    let pick = {
        let mut rng = rand::thread_rng();
        random_pick(&projection, kind, &mut rng)
    };
    let Some(entry) = pick else {
        output.warn(format!("Every {} in your list is completed", kind));
        return Ok(());
    };

    if output.is_human() {
        output.success(format!("Tonight: {} ({})", entry.title.bold(), entry.catalog_id));
    } else {
        output.json(&json!({ "type": "pick", "entry": entry }));
    }
    Ok(())
}

fn result_rows(results: &[SearchResult], projection: &Projection) -> Vec<serde_json::Value> {
    results
        .iter()
        .map(|result| {
            let entry = projection.get(result.catalog_id);
            json!({
                "result": result,
                "in_list": entry.is_some(),
                "status": entry.and_then(|e| e.status),
            })
        })
        .collect()
}

fn results_table(results: &[SearchResult], projection: &Projection) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        ["Id", "Title", "Kind", "Date", "Vote", "In list"]
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );

    for result in results {
        let in_list = match projection.get(result.catalog_id) {
            Some(entry) => Cell::new(entry.status.map(|s| s.as_str()).unwrap_or("yes")).fg(Color::Green),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(result.catalog_id),
            Cell::new(&result.title),
            Cell::new(result.media_kind.as_str()),
            Cell::new(result.release_date.as_deref().unwrap_or("")),
            Cell::new(format!("{:.1}", result.vote_average)),
            in_list,
        ]);
    }
    table
}
