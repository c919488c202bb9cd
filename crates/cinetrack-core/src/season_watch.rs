//! Daily check for new seasons of finished series.
//!
//! A pass runs at most once per local calendar day per device. For every
//! completed series of the session owner the current catalog season count is
//! compared with the stored baseline. An entry without a baseline is
//! baselined silently; a real increase is persisted first and then announced
//! once through the notification channel.

use chrono::Utc;
use cinetrack_models::{fields, EntryUpdate, ListEntry, MediaKind, Predicate, WatchStatus};
use cinetrack_sources::{CatalogClient, DocumentStore};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::gate::DailyGate;
use crate::session::Session;

/// A detected season increase, ready to be shown to the user
#[derive(Debug, Clone)]
pub struct SeasonNotification {
    pub catalog_id: u64,
    pub document_id: String,
    pub title: String,
    pub previous_season_count: u32,
    pub new_season_count: u32,
    pub accept: AcceptAction,
}

/// Moves the entry back to "planned" with the new season count as baseline
#[derive(Clone)]
pub struct AcceptAction {
    store: Arc<dyn DocumentStore>,
    collection: String,
    document_id: String,
    new_season_count: u32,
}

impl AcceptAction {
    pub async fn invoke(&self) -> Result<(), SyncError> {
        let patch = EntryUpdate::accept_new_season(self.new_season_count).into_fields(MediaKind::Series, Utc::now());
        self.store.update(&self.collection, &self.document_id, patch).await?;
        info!(
            operation = "season_accept",
            document_id = %self.document_id,
            total_seasons = self.new_season_count,
            "Series moved back to planned"
        );
        Ok(())
    }
}

impl fmt::Debug for AcceptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptAction")
            .field("document_id", &self.document_id)
            .field("new_season_count", &self.new_season_count)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SeasonCheckReport {
    pub day: String,
    /// The gate was closed; nothing was fetched
    pub skipped: bool,
    pub candidates: usize,
    pub unchanged: usize,
    pub baselined: usize,
    pub notified: usize,
    pub failed: usize,
}

enum ItemOutcome {
    Unchanged,
    Baselined,
    Notified,
}

pub struct SeasonWatcher {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<dyn CatalogClient>,
    gate: DailyGate,
    session: Session,
    collection: String,
    notifications: mpsc::UnboundedSender<SeasonNotification>,
}

impl SeasonWatcher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        catalog: Arc<dyn CatalogClient>,
        gate: DailyGate,
        session: Session,
        collection: impl Into<String>,
        notifications: mpsc::UnboundedSender<SeasonNotification>,
    ) -> Self {
        Self {
            store,
            catalog,
            gate,
            session,
            collection: collection.into(),
            notifications,
        }
    }

    /// Run one pass if the gate is open.
    ///
    /// Per-item catalog or write failures are logged and counted, and do not
    /// stop the pass. A failed candidate query aborts the pass without
    /// closing the gate, so the next session retries.
    pub async fn run(&self) -> Result<SeasonCheckReport, SyncError> {
        let day = self.gate.today();
        if !self.gate.is_open(&day)? {
            info!(operation = "season_check_gate", day = %day, "Season check already ran today, skipping");
            return Ok(SeasonCheckReport {
                day,
                skipped: true,
                ..SeasonCheckReport::default()
            });
        }

        let candidates = self.candidates().await?;
        info!(
            operation = "season_check_start",
            day = %day,
            candidates = candidates.len(),
            "Checking completed series for new seasons"
        );

        let mut report = SeasonCheckReport {
            day: day.clone(),
            candidates: candidates.len(),
            ..SeasonCheckReport::default()
        };

        for entry in &candidates {
            match self.reconcile(entry).await {
                Ok(ItemOutcome::Unchanged) => report.unchanged += 1,
                Ok(ItemOutcome::Baselined) => report.baselined += 1,
                Ok(ItemOutcome::Notified) => report.notified += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        operation = "season_check_item_skipped",
                        catalog_id = entry.catalog_id,
                        title = %entry.title,
                        "Skipping series: {}",
                        e
                    );
                }
            }
        }

        self.gate.close(&day)?;
        info!(
            operation = "season_check_done",
            day = %day,
            unchanged = report.unchanged,
            baselined = report.baselined,
            notified = report.notified,
            failed = report.failed,
            "Season check finished"
        );
        Ok(report)
    }

    async fn candidates(&self) -> Result<Vec<ListEntry>, SyncError> {
        // Kind is filtered after normalization so older documents that
        // spell it differently are still found
        let predicates = [
            self.session.owner_predicate(),
            Predicate::eq(fields::STATUS, WatchStatus::Completed.as_str()),
        ];
        let documents = self.store.query(&self.collection, &predicates).await?;
        Ok(documents
            .iter()
            .filter_map(ListEntry::from_document)
            .filter(ListEntry::is_series)
            .collect())
    }

    async fn reconcile(&self, entry: &ListEntry) -> Result<ItemOutcome, SyncError> {
        let detail = self.catalog.series_detail(entry.catalog_id).await?;
        let fetched = detail.season_count;
        let previous = entry.total_seasons;

        if fetched <= previous {
            debug!(
                operation = "season_check_item",
                catalog_id = entry.catalog_id,
                seasons = previous,
                "No new seasons"
            );
            return Ok(ItemOutcome::Unchanged);
        }

        // Persist before announcing so the same increase is never reported twice
        let patch = EntryUpdate::season_baseline(fetched).into_fields(MediaKind::Series, Utc::now());
        self.store.update(&self.collection, &entry.document_id, patch).await?;

        if previous == 0 {
            debug!(
                operation = "season_baseline",
                catalog_id = entry.catalog_id,
                seasons = fetched,
                "Recorded first season baseline"
            );
            return Ok(ItemOutcome::Baselined);
        }

        let notification = SeasonNotification {
            catalog_id: entry.catalog_id,
            document_id: entry.document_id.clone(),
            title: entry.title.clone(),
            previous_season_count: previous,
            new_season_count: fetched,
            accept: AcceptAction {
                store: self.store.clone(),
                collection: self.collection.clone(),
                document_id: entry.document_id.clone(),
                new_season_count: fetched,
            },
        };
        info!(
            operation = "season_notification",
            catalog_id = entry.catalog_id,
            title = %entry.title,
            previous = previous,
            new = fetched,
            "New season detected"
        );
        if self.notifications.send(notification).is_err() {
            debug!("No notification listener, baseline already saved");
        }
        Ok(ItemOutcome::Notified)
    }
}
