use super::context::AppContext;
use crate::output::Output;
use cinetrack_core::SaveOutcome;
use cinetrack_models::{CatalogSnapshot, EntryDraft, EntryUpdate, ListEntry, MediaKind, WatchStatus};
use color_eyre::Result;
use serde_json::json;
use tracing::warn;

pub struct AddArgs {
    pub catalog_id: u64,
    pub kind: MediaKind,
    pub status: WatchStatus,
    pub score: Option<u8>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub review: Option<String>,
    pub title: Option<String>,
}

pub async fn run_add(args: AddArgs, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut synchronizer = ctx.synchronizer();
    match ctx.catalog() {
        Ok(catalog) => synchronizer = synchronizer.with_catalog(catalog),
        Err(e) => warn!(operation = "catalog_unavailable", "Saving without catalog details: {}", e),
    }

    let projection = synchronizer.load().await?;
    let existing = projection.get(args.catalog_id);
    if args.score.is_some() && !args.status.accepts_score() {
        output.warn(format!("Score is only kept for completed or dropped items, not '{}'", args.status));
    }

    let draft = EntryDraft::new(
        args.catalog_id,
        args.kind,
        args.status,
        fallback_snapshot(args.catalog_id, existing, args.title),
    )
    .with_score(args.score)
    .with_progress(args.season, args.episode)
    .with_review(args.review);

    let outcome = synchronizer.save(&projection, draft).await?;
    let (action, document_id) = match &outcome {
        SaveOutcome::Created(id) => ("added", id),
        SaveOutcome::Updated(id) => ("updated", id),
        SaveOutcome::Replaced(id) => ("replaced", id),
    };

    if output.is_human() {
        output.success(format!("{} {} {}", capitalize(action), args.kind, args.catalog_id));
    } else {
        output.json(&json!({
            "type": "save",
            "action": action,
            "catalog_id": args.catalog_id,
            "document_id": document_id,
        }));
    }
    Ok(())
}

pub struct EditArgs {
    pub catalog_id: u64,
    pub status: Option<WatchStatus>,
    pub score: Option<u8>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub review: Option<String>,
}

pub async fn run_edit(args: EditArgs, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let synchronizer = ctx.synchronizer();
    let projection = synchronizer.load().await?;

    let Some(entry) = projection.get(args.catalog_id) else {
        return Err(color_eyre::eyre::eyre!("Catalog id {} is not in your list", args.catalog_id));
    };
    let update = EntryUpdate::edit_of(entry, args.status, args.score, args.review, args.season, args.episode);
    let status = update.status.unwrap_or(WatchStatus::Planned);
    if args.score.is_some() && !status.accepts_score() {
        output.warn(format!("Score is only kept for completed or dropped items, not '{}'", status));
    }
    synchronizer.update(&entry.document_id, entry.media_kind, update).await?;

    if output.is_human() {
        output.success(format!("Updated '{}' ({})", entry.title, status));
    } else {
        output.json(&json!({
            "type": "edit",
            "catalog_id": args.catalog_id,
            "document_id": entry.document_id,
            "status": status.as_str(),
        }));
    }
    Ok(())
}

pub async fn run_favorite(catalog_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let synchronizer = ctx.synchronizer();
    let projection = synchronizer.load().await?;

    let Some(entry) = projection.get(catalog_id) else {
        return Err(color_eyre::eyre::eyre!("Catalog id {} is not in your list", catalog_id));
    };
    let favorite = synchronizer.toggle_favorite(entry).await?;

    if output.is_human() {
        if favorite {
            output.success(format!("Added '{}' to favorites", entry.title));
        } else {
            output.success(format!("Removed '{}' from favorites", entry.title));
        }
    } else {
        output.json(&json!({ "type": "favorite", "catalog_id": catalog_id, "is_favorite": favorite }));
    }
    Ok(())
}

pub async fn run_remove(catalog_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let synchronizer = ctx.synchronizer();
    let projection = synchronizer.load().await?;
    let removed = synchronizer.remove_by_catalog_id(&projection, catalog_id).await?;

    if output.is_human() {
        if removed {
            output.success(format!("Removed {} from your list", catalog_id));
        } else {
            output.warn(format!("Catalog id {} is not in your list", catalog_id));
        }
    } else {
        output.json(&json!({ "type": "remove", "catalog_id": catalog_id, "removed": removed }));
    }
    Ok(())
}

/// Display fields to save when the catalog cannot be reached.
///
/// An existing entry keeps what it already has, so a failed refresh does
/// not blank its poster or genres.
fn fallback_snapshot(catalog_id: u64, existing: Option<&ListEntry>, title: Option<String>) -> CatalogSnapshot {
    match existing {
        Some(entry) => CatalogSnapshot {
            title: title.unwrap_or_else(|| entry.title.clone()),
            original_title: entry.original_title.clone(),
            overview: entry.overview.clone(),
            poster_path: entry.poster_path.clone(),
            vote_average: entry.vote_average,
            original_language: entry.original_language.clone(),
            release_date: entry.release_date.clone(),
            genres: entry.genres.clone(),
            runtime: entry.runtime,
        },
        None => CatalogSnapshot::titled(title.unwrap_or_else(|| format!("#{}", catalog_id))),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinetrack_models::Document;
    use serde_json::Map;

    #[test]
    fn test_fallback_snapshot_keeps_existing_fields() {
        let fields: Map<String, serde_json::Value> = serde_json::from_value(json!({
            "ownerId": "u", "catalogId": 7, "mediaKind": "movie", "title": "Heat",
            "posterPath": "/heat.jpg", "genres": ["Crime"], "runtime": 170
        }))
        .unwrap();
        let entry = ListEntry::from_document(&Document::new("d1", fields)).unwrap();

        let snapshot = fallback_snapshot(7, Some(&entry), None);
        assert_eq!(snapshot.title, "Heat");
        assert_eq!(snapshot.poster_path.as_deref(), Some("/heat.jpg"));
        assert_eq!(snapshot.genres, vec!["Crime".to_string()]);
        assert_eq!(snapshot.runtime, Some(170));
    }

    #[test]
    fn test_fallback_snapshot_for_new_entry() {
        assert_eq!(fallback_snapshot(42, None, None).title, "#42");
        assert_eq!(fallback_snapshot(42, None, Some("Dune".to_string())).title, "Dune");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("added"), "Added");
        assert_eq!(capitalize(""), "");
    }
}
