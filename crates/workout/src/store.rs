//! Workout storage
//!
//! Keys in the workout store (~/.local/share/vitalis/workout/):
//! - workouts.json: the catalog
//! - active-run.json: the run currently counting down, if any
//! - history.json: finished runs

use anyhow::Result;
use chrono::{Duration, Utc};
use std::path::Path;
use tracing::{info, warn};
use vitalis_core::KvStore;

use crate::run::{ActiveRun, RunRecord};
use crate::timer::TimerError;
use crate::workout::WorkoutCatalog;

const CATALOG_KEY: &str = "workouts";
const ACTIVE_KEY: &str = "active-run";
const HISTORY_KEY: &str = "history";

/// Workout store
pub struct WorkoutStore {
    store: KvStore,
}

impl WorkoutStore {
    /// Open the store in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: KvStore::open(data_dir)?,
        })
    }

    /// Load the catalog, resetting workouts stuck mid image generation
    ///
    /// Starts from the built-in workouts until a catalog is saved.
    pub fn load_catalog(&self) -> WorkoutCatalog {
        let mut catalog: WorkoutCatalog = self.store.load_or(CATALOG_KEY, WorkoutCatalog::starter);
        let reset = catalog.sanitize();
        if reset > 0 {
            warn!("Reset {} workout(s) left waiting for an image", reset);
        }
        catalog
    }

    pub fn save_catalog(&self, catalog: &WorkoutCatalog) -> Result<()> {
        self.store.put(CATALOG_KEY, catalog)
    }

    /// The run currently counting down, if any
    pub fn active_run(&self) -> Option<ActiveRun> {
        self.store.load_or(ACTIVE_KEY, || None)
    }

    /// Claim the single active-run slot
    pub fn begin_run(&self, run: &ActiveRun) -> Result<()> {
        if let Some(existing) = self.active_run() {
            warn!("Refusing to start: '{}' is still running", existing.workout_name);
            return Err(TimerError::AlreadyActive.into());
        }
        self.store.put(ACTIVE_KEY, &Some(run))?;
        info!("Started '{}'", run.workout_name);
        Ok(())
    }

    /// Whether the active-run slot still belongs to `run`
    pub fn owns_run(&self, run: &ActiveRun) -> bool {
        self.active_run().is_some_and(|active| active.owner == run.owner)
    }

    /// Save the latest state of the active run
    ///
    /// Returns false without writing when the slot was cleared or claimed by
    /// another run, which means the run was stopped from elsewhere.
    pub fn update_run(&self, run: &ActiveRun) -> Result<bool> {
        if !self.owns_run(run) {
            info!("'{}' no longer holds the active-run slot", run.workout_name);
            return Ok(false);
        }
        self.store.put(ACTIVE_KEY, &Some(run))?;
        Ok(true)
    }

    /// Release the slot if `run` still holds it; false if it was already taken away
    pub fn release_run(&self, run: &ActiveRun) -> Result<bool> {
        if !self.owns_run(run) {
            return Ok(false);
        }
        self.store.remove(ACTIVE_KEY)?;
        Ok(true)
    }

    /// Clear the active-run slot whoever holds it
    pub fn clear_run(&self) -> Result<()> {
        self.store.remove(ACTIVE_KEY)
    }

    /// Append a finished run to history
    pub fn record_run(&self, record: &RunRecord) -> Result<()> {
        let mut history = self.history();
        history.push(record.clone());
        self.store.put(HISTORY_KEY, &history)
    }

    /// All finished runs, oldest first
    pub fn history(&self) -> Vec<RunRecord> {
        let mut history: Vec<RunRecord> = self.store.load_or(HISTORY_KEY, Vec::new);
        history.sort_by_key(|r| r.start);
        history
    }

    /// Finished runs that started within the last `days` days
    pub fn history_for_days(&self, days: u32) -> Vec<RunRecord> {
        let cutoff = (Utc::now() - Duration::days(i64::from(days))).timestamp();
        self.history()
            .into_iter()
            .filter(|r| r.start >= cutoff)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{TimerConfig, WorkoutTimer};
    use crate::workout::NewWorkout;
    use std::fs;

    fn temp_store() -> (WorkoutStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::new(dir.path()).unwrap();
        (store, dir)
    }

    fn active(store: &WorkoutStore) -> ActiveRun {
        let mut catalog = store.load_catalog();
        let workout = catalog
            .add_custom(NewWorkout {
                name: "Lunges".to_string(),
                sets: 2,
                work_seconds: 30,
                rest_seconds: 10,
                ..Default::default()
            })
            .unwrap()
            .clone();
        store.save_catalog(&catalog).unwrap();

        let mut timer = WorkoutTimer::new();
        let run = timer.start(TimerConfig::new(2, 30, 10).unwrap()).unwrap().clone();
        ActiveRun::new(&workout, run)
    }

    #[test]
    fn test_fresh_store() {
        let (store, _dir) = temp_store();
        assert_eq!(store.load_catalog(), WorkoutCatalog::starter());
        assert!(store.active_run().is_none());
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_catalog_roundtrip_sanitizes() {
        let (store, dir) = temp_store();
        let run = active(&store);

        let mut catalog = store.load_catalog();
        assert_eq!(catalog.len(), WorkoutCatalog::starter().len() + 1);
        catalog.mark_completed(run.workout_id).unwrap();
        store.save_catalog(&catalog).unwrap();
        assert!(store.load_catalog().get(run.workout_id).unwrap().completed);

        let raw = fs::read_to_string(dir.path().join("workouts.json")).unwrap();
        let patched = raw.replace("\"loading_image\": false", "\"loading_image\": true");
        fs::write(dir.path().join("workouts.json"), patched).unwrap();
        assert!(!store.load_catalog().get(run.workout_id).unwrap().loading_image);
    }

    #[test]
    fn test_single_active_run() {
        let (store, _dir) = temp_store();
        let run = active(&store);

        store.begin_run(&run).unwrap();
        let err = store.begin_run(&run).unwrap_err();
        assert_eq!(err.downcast_ref::<TimerError>(), Some(&TimerError::AlreadyActive));

        store.clear_run().unwrap();
        store.clear_run().unwrap();
        assert!(store.active_run().is_none());
        store.begin_run(&run).unwrap();
    }

    #[test]
    fn test_update_run_is_visible() {
        let (store, _dir) = temp_store();
        let mut run = active(&store);
        store.begin_run(&run).unwrap();

        run.timer.remaining_seconds = 12;
        assert!(store.update_run(&run).unwrap());
        assert_eq!(store.active_run().unwrap().timer.remaining_seconds, 12);
    }

    #[test]
    fn test_stopped_run_does_not_reclaim_slot() {
        let (store, _dir) = temp_store();
        let mut run = active(&store);
        store.begin_run(&run).unwrap();

        // `workout stop` from another terminal
        let stopped = store.active_run().unwrap();
        store.record_run(&RunRecord::from_run(&stopped, &stopped.timer, false)).unwrap();
        store.clear_run().unwrap();

        // the timer process ticks once more
        run.timer.remaining_seconds -= 1;
        assert!(!store.update_run(&run).unwrap());
        assert!(store.active_run().is_none());
        assert!(!store.release_run(&run).unwrap());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_other_owner_keeps_slot() {
        let (store, _dir) = temp_store();
        let run = active(&store);
        store.begin_run(&run).unwrap();

        let mut intruder = run.clone();
        intruder.owner = "someone-else".to_string();
        intruder.timer.remaining_seconds = 1;

        assert!(!store.owns_run(&intruder));
        assert!(!store.update_run(&intruder).unwrap());
        assert!(!store.release_run(&intruder).unwrap());
        assert_eq!(store.active_run().unwrap(), run);

        assert!(store.release_run(&run).unwrap());
        assert!(store.active_run().is_none());
    }

    #[test]
    fn test_record_and_filter_history() {
        let (store, _dir) = temp_store();
        let run = active(&store);

        store.record_run(&RunRecord::from_run(&run, &run.timer, true)).unwrap();

        let mut old = RunRecord::from_run(&run, &run.timer, false);
        old.start -= 30 * 24 * 3600;
        old.end = old.start + 60;
        store.record_run(&old).unwrap();

        assert_eq!(store.history().len(), 2);
        assert!(store.history()[0].start < store.history()[1].start);

        let recent = store.history_for_days(7);
        assert_eq!(recent.len(), 1);
        assert!(recent[0].completed);
    }
}
