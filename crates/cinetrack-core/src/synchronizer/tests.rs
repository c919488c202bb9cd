use super::*;
use crate::testing::FakeCatalog;
use cinetrack_models::{Document, WatchStatus};
use cinetrack_sources::LocalStore;
use serde_json::json;

const COLLECTION: &str = "user_lists";

fn setup() -> (Arc<LocalStore>, ListSynchronizer) {
    let store = Arc::new(LocalStore::in_memory());
    let sync = ListSynchronizer::new(store.clone(), COLLECTION, Session::new("alice"));
    (store, sync)
}

fn draft(catalog_id: u64, kind: MediaKind, status: WatchStatus) -> EntryDraft {
    EntryDraft::new(catalog_id, kind, status, CatalogSnapshot::titled(format!("Title {}", catalog_id)))
}

async fn stored(store: &LocalStore) -> Vec<Document> {
    store.query(COLLECTION, &[]).await.unwrap()
}

#[tokio::test]
async fn test_subscribe_delivers_initial_and_pushed_projections() {
    let (_store, sync) = setup();
    let mut stream = sync.subscribe().await.unwrap();

    let initial = stream.next().await.unwrap().unwrap();
    assert!(initial.is_empty());

    sync.create(draft(10, MediaKind::Movie, WatchStatus::Planned)).await.unwrap();
    let pushed = stream.next().await.unwrap().unwrap();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed.get(10).unwrap().title, "Title 10");
}

#[tokio::test]
async fn test_projection_only_contains_session_owner() {
    let (store, sync) = setup();
    store
        .create(COLLECTION, json!({"ownerId": "bob", "catalogId": 1}).as_object().cloned().unwrap())
        .await
        .unwrap();
    sync.create(draft(2, MediaKind::Movie, WatchStatus::Planned)).await.unwrap();

    let projection = sync.load().await.unwrap();
    assert_eq!(projection.len(), 1);
    assert!(projection.get(2).is_some());

    let shared = sync.fetch_shared("bob").await.unwrap();
    assert_eq!(shared.len(), 1);
    assert!(shared.get(1).is_some());
}

#[tokio::test]
async fn test_duplicate_documents_collapse_to_latest() {
    let (store, sync) = setup();
    for title in ["Old", "New"] {
        store
            .create(
                COLLECTION,
                json!({"ownerId": "alice", "catalogId": 5, "mediaKind": "movie", "title": title})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();
    }

    let projection = sync.load().await.unwrap();
    assert_eq!(projection.len(), 1);
    assert_eq!(projection.get(5).unwrap().title, "New");
}

#[tokio::test]
async fn test_unsubscribe_releases_listener() {
    let (store, sync) = setup();
    let stream = sync.subscribe().await.unwrap();
    assert_eq!(store.listener_count(), 1);

    stream.unsubscribe();
    assert_eq!(store.listener_count(), 0);

    let dropped = sync.subscribe().await.unwrap();
    drop(dropped);
    assert_eq!(store.listener_count(), 0);
}

#[tokio::test]
async fn test_subscription_error_is_surfaced_without_retry() {
    let (store, sync) = setup();
    let mut stream = sync.subscribe().await.unwrap();
    let _ = stream.next().await;

    store.revoke_subscriptions("permission-denied");

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(err.is_subscription());
    assert!(stream.next().await.is_none());
    assert_eq!(store.listener_count(), 0);
}

#[tokio::test]
async fn test_score_is_nulled_for_planned_entries() {
    let (store, sync) = setup();
    let projection = Projection::default();
    sync.save(
        &projection,
        draft(3, MediaKind::Movie, WatchStatus::Planned).with_score(Some(8)),
    )
    .await
    .unwrap();

    let docs = stored(&store).await;
    assert_eq!(docs[0].get("score"), Some(&Value::Null));
}

#[tokio::test]
async fn test_save_updates_existing_entry_in_place() {
    let (store, sync) = setup();
    sync.save(&Projection::default(), draft(4, MediaKind::Series, WatchStatus::Watching))
        .await
        .unwrap();

    let projection = sync.load().await.unwrap();
    let entry = projection.get(4).unwrap().clone();
    assert!(sync.toggle_favorite(&entry).await.unwrap());
    sync.update(&entry.document_id, entry.media_kind, EntryUpdate::season_baseline(2))
        .await
        .unwrap();

    let projection = sync.load().await.unwrap();
    let outcome = sync
        .save(
            &projection,
            draft(4, MediaKind::Series, WatchStatus::Completed)
                .with_score(Some(9))
                .with_progress(Some(2), Some(10)),
        )
        .await
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Updated(entry.document_id.clone()));

    let docs = stored(&store).await;
    assert_eq!(docs.len(), 1);
    let saved = ListEntry::from_document(&docs[0]).unwrap();
    assert_eq!(saved.status, Some(WatchStatus::Completed));
    assert_eq!(saved.score, Some(9));
    assert_eq!(saved.current_episode, Some(10));
    assert!(saved.is_favorite);
    assert_eq!(saved.total_seasons, 2);
    assert_eq!(saved.added_at, entry.added_at);
}

#[tokio::test]
async fn test_save_refreshes_catalog_fields() {
    let (store, sync) = setup();
    let sync = sync.with_catalog(Arc::new(FakeCatalog::default().with_series(7, 3).with_movie(8, 130)));

    sync.save(&Projection::default(), draft(7, MediaKind::Series, WatchStatus::Planned))
        .await
        .unwrap();
    sync.save(&Projection::default(), draft(8, MediaKind::Movie, WatchStatus::Completed))
        .await
        .unwrap();

    let projection = sync.load().await.unwrap();
    let series = projection.get(7).unwrap();
    assert_eq!(series.total_seasons, 3);
    assert_eq!(series.total_episodes, Some(30));
    assert_eq!(series.catalog_status.as_deref(), Some("Returning Series"));
    assert_eq!(series.genres, vec!["Drama"]);

    let movie = projection.get(8).unwrap();
    assert_eq!(movie.runtime, Some(130));
    assert_eq!(stored(&store).await.len(), 2);
}

#[tokio::test]
async fn test_save_tolerates_catalog_failure() {
    let (_store, sync) = setup();
    let sync = sync.with_catalog(Arc::new(FakeCatalog::default().failing(9)));

    let outcome = sync
        .save(&Projection::default(), draft(9, MediaKind::Series, WatchStatus::Watching))
        .await
        .unwrap();
    assert!(matches!(outcome, SaveOutcome::Created(_)));

    let projection = sync.load().await.unwrap();
    let entry = projection.get(9).unwrap();
    assert_eq!(entry.title, "Title 9");
    assert_eq!(entry.total_seasons, 0);
}

#[tokio::test]
async fn test_kind_change_recreates_entry() {
    let (store, sync) = setup();
    let first = sync.create(draft(11, MediaKind::Movie, WatchStatus::Planned)).await.unwrap();

    let projection = sync.load().await.unwrap();
    let outcome = sync
        .save(&projection, draft(11, MediaKind::Series, WatchStatus::Planned))
        .await
        .unwrap();

    match outcome {
        SaveOutcome::Replaced(id) => assert_ne!(id, first),
        other => panic!("expected replacement, got {:?}", other),
    }
    let docs = stored(&store).await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get("mediaKind"), Some(&json!("series")));
}

#[tokio::test]
async fn test_remove_by_catalog_id() {
    let (store, sync) = setup();
    sync.create(draft(12, MediaKind::Movie, WatchStatus::Planned)).await.unwrap();

    let projection = sync.load().await.unwrap();
    assert!(!sync.remove_by_catalog_id(&projection, 999).await.unwrap());
    assert!(sync.remove_by_catalog_id(&projection, 12).await.unwrap());
    assert!(stored(&store).await.is_empty());
}

#[tokio::test]
async fn test_mutating_deleted_entry_is_not_found() {
    let (_store, sync) = setup();
    let id = sync.create(draft(13, MediaKind::Movie, WatchStatus::Planned)).await.unwrap();
    sync.remove(&id).await.unwrap();

    let err = sync
        .update(&id, MediaKind::Movie, EntryUpdate::favorite(true))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_documents_from_older_clients_reach_the_projection() {
    let (store, sync) = setup();
    let legacy = json!({"userId": "alice", "tmdbId": 9, "type": "tv", "status": "completed", "total_seasons": 2});
    store
        .create(COLLECTION, legacy.as_object().cloned().unwrap())
        .await
        .unwrap();
    store
        .create(COLLECTION, json!({"userId": "bob", "tmdbId": 10}).as_object().cloned().unwrap())
        .await
        .unwrap();

    let projection = sync.load().await.unwrap();
    assert_eq!(projection.len(), 1);
    let entry = projection.get(9).unwrap();
    assert_eq!(entry.media_kind, MediaKind::Series);
    assert_eq!(entry.total_seasons, 2);

    let mut stream = sync.subscribe().await.unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap().len(), 1);
    assert_eq!(sync.fetch_shared("bob").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_updates_status_and_progress_in_place() {
    let (store, sync) = setup();
    sync.create(draft(5, MediaKind::Series, WatchStatus::Watching).with_progress(Some(1), Some(4)))
        .await
        .unwrap();

    let projection = sync.load().await.unwrap();
    let entry = projection.get(5).unwrap();
    let update = EntryUpdate::edit_of(entry, Some(WatchStatus::Completed), Some(8), Some("great".to_string()), None, None);
    sync.update(&entry.document_id, entry.media_kind, update).await.unwrap();

    let docs = stored(&store).await;
    assert_eq!(docs.len(), 1);
    let edited = ListEntry::from_document(&docs[0]).unwrap();
    assert_eq!(edited.status, Some(WatchStatus::Completed));
    assert_eq!(edited.score, Some(8));
    assert_eq!(edited.review.as_deref(), Some("great"));
    assert_eq!(edited.current_season, Some(1));
    assert_eq!(edited.current_episode, Some(4));
    assert_eq!(edited.title, "Title 5");
}
