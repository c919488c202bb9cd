//! Once-per-calendar-day gate for the season check.
//!
//! The gate compares day strings only; time of day plays no part.

use chrono::{Local, NaiveDate};
use cinetrack_config::LocalStateStore;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::SyncError;

/// Day strings look like "Mon Jan 01 2024"
pub const DAY_FORMAT: &str = "%a %b %d %Y";

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub trait ClockSource: Send + Sync {
    /// Today's date in the device's local time zone
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl ClockSource for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Device-local record of the last day the season check ran
pub trait LastRunStore: Send + Sync {
    fn last_run(&self) -> Result<Option<String>, SyncError>;

    fn record_run(&self, day: &str) -> Result<(), SyncError>;
}

/// [`LastRunStore`] kept in the local state file
pub struct FileLastRunStore {
    state: Mutex<LocalStateStore>,
}

impl FileLastRunStore {
    pub fn open(path: PathBuf) -> Result<Self, SyncError> {
        let state = LocalStateStore::open(path).map_err(|e| SyncError::LastRun(e.to_string()))?;
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LocalStateStore>, SyncError> {
        self.state
            .lock()
            .map_err(|_| SyncError::LastRun("local state lock is poisoned".to_string()))
    }
}

impl LastRunStore for FileLastRunStore {
    fn last_run(&self) -> Result<Option<String>, SyncError> {
        let mut state = self.lock()?;
        // Another process on this device may have run the check
        state.load().map_err(|e| SyncError::LastRun(e.to_string()))?;
        Ok(state.get_last_season_check().cloned())
    }

    fn record_run(&self, day: &str) -> Result<(), SyncError> {
        let mut state = self.lock()?;
        state.set_last_season_check(day.to_string());
        state.save().map_err(|e| SyncError::LastRun(e.to_string()))?;
        debug!("Recorded season check day {} in {}", day, state.path().display());
        Ok(())
    }
}

#[derive(Clone)]
pub struct DailyGate {
    clock: Arc<dyn ClockSource>,
    last_run: Arc<dyn LastRunStore>,
}

impl DailyGate {
    pub fn new(clock: Arc<dyn ClockSource>, last_run: Arc<dyn LastRunStore>) -> Self {
        Self { clock, last_run }
    }

    pub fn today(&self) -> String {
        day_key(self.clock.today())
    }

    /// `true` when the check has not yet run on `today`
    pub fn is_open(&self, today: &str) -> Result<bool, SyncError> {
        Ok(self.last_run.last_run()?.as_deref() != Some(today))
    }

    pub fn close(&self, today: &str) -> Result<(), SyncError> {
        self.last_run.record_run(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, FixedClock, MemoryLastRunStore};

    #[test]
    fn test_day_key_format() {
        assert_eq!(day_key(date(2024, 1, 1)), "Mon Jan 01 2024");
        assert_eq!(day_key(date(2025, 11, 23)), "Sun Nov 23 2025");
    }

    #[test]
    fn test_gate_opens_once_per_day() {
        let store = Arc::new(MemoryLastRunStore::with_value("Mon Jan 01 2024"));
        let gate = DailyGate::new(Arc::new(FixedClock(date(2024, 1, 1))), store.clone());

        let today = gate.today();
        assert!(!gate.is_open(&today).unwrap());

        let tomorrow = day_key(date(2024, 1, 2));
        assert!(gate.is_open(&tomorrow).unwrap());
        gate.close(&tomorrow).unwrap();
        assert_eq!(store.value().as_deref(), Some("Tue Jan 02 2024"));
        assert!(!gate.is_open(&tomorrow).unwrap());
    }

    #[test]
    fn test_file_last_run_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");

        let store = FileLastRunStore::open(path.clone()).unwrap();
        assert_eq!(store.last_run().unwrap(), None);
        store.record_run("Mon Jan 01 2024").unwrap();

        let reopened = FileLastRunStore::open(path).unwrap();
        assert_eq!(reopened.last_run().unwrap().as_deref(), Some("Mon Jan 01 2024"));
    }
}
