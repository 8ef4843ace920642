//! Wellness storage
//!
//! Keys in the wellness store (~/.local/share/vitalis/wellness/):
//! - sleep.json: sleep entries by date
//! - mood.json: mood entries in log order
//! - challenges.json: challenge progress

use anyhow::Result;
use std::path::Path;
use vitalis_core::KvStore;

use crate::challenge::ChallengeBoard;
use crate::mood::MoodLog;
use crate::sleep::SleepLog;

const SLEEP_KEY: &str = "sleep";
const MOOD_KEY: &str = "mood";
const CHALLENGES_KEY: &str = "challenges";

pub struct WellnessStore {
    store: KvStore,
}

impl WellnessStore {
    /// Open the store in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: KvStore::open(data_dir)?,
        })
    }

    pub fn sleep(&self) -> SleepLog {
        let mut log: SleepLog = self.store.load_or(SLEEP_KEY, SleepLog::default);
        log.normalize();
        log
    }

    pub fn save_sleep(&self, log: &SleepLog) -> Result<()> {
        self.store.put(SLEEP_KEY, log)
    }

    pub fn moods(&self) -> MoodLog {
        self.store.load_or(MOOD_KEY, MoodLog::default)
    }

    pub fn save_moods(&self, log: &MoodLog) -> Result<()> {
        self.store.put(MOOD_KEY, log)
    }

    /// Challenge progress, the default board if none is saved
    pub fn challenges(&self) -> ChallengeBoard {
        self.store.load_or(CHALLENGES_KEY, ChallengeBoard::default)
    }

    pub fn save_challenges(&self, board: &ChallengeBoard) -> Result<()> {
        self.store.put(CHALLENGES_KEY, board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use crate::sleep::SleepEntry;
    use chrono::NaiveDate;
    use std::fs;

    fn temp_store() -> (WellnessStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = WellnessStore::new(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_defaults_when_empty() {
        let (store, _dir) = temp_store();
        assert!(store.sleep().is_empty());
        assert!(store.moods().is_empty());
        assert_eq!(store.challenges(), ChallengeBoard::default());
    }

    #[test]
    fn test_sleep_roundtrip() {
        let (store, _dir) = temp_store();
        let date = NaiveDate::from_ymd_opt(2024, 7, 28).unwrap();

        let mut log = store.sleep();
        log.log(SleepEntry::new(date, 7.0, 3).unwrap());
        store.save_sleep(&log).unwrap();

        let mut log = store.sleep();
        log.log(SleepEntry::new(date, 8.5, 4).unwrap());
        store.save_sleep(&log).unwrap();

        let loaded = store.sleep();
        assert_eq!(loaded.entries().len(), 1);
        assert_eq!(loaded.get(date).unwrap().hours_slept, 8.5);
    }

    #[test]
    fn test_mood_and_challenges_roundtrip() {
        let (store, _dir) = temp_store();

        let mut moods = store.moods();
        moods.record(Mood::Calm, Some("evening walk".to_string()), 1_700_000_000);
        store.save_moods(&moods).unwrap();
        assert_eq!(store.moods(), moods);

        let mut board = store.challenges();
        board.progress(2).unwrap();
        store.save_challenges(&board).unwrap();
        assert_eq!(store.challenges().get(2).unwrap().current_value, 2);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let (store, dir) = temp_store();
        fs::write(dir.path().join("challenges.json"), "{not json").unwrap();
        assert_eq!(store.challenges(), ChallengeBoard::default());
    }
}
