//! Cycle settings storage
//!
//! Settings live under the `cycle` key of the tool's store:
//! - ~/.local/share/vitalis/cycle/cycle.json

use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use vitalis_core::KvStore;

use crate::phase::CycleConfig;

const CONFIG_KEY: &str = "cycle";

/// Cycle settings store
pub struct CycleStore {
    store: KvStore,
}

impl CycleStore {
    /// Open the store in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: KvStore::open(data_dir)?,
        })
    }

    /// Load the settings
    ///
    /// When nothing usable is stored, the period is assumed to have started
    /// `today` with `default_length` days per cycle.
    pub fn load(&self, today: NaiveDate, default_length: u32) -> CycleConfig {
        self.store.load_or(CONFIG_KEY, || {
            CycleConfig::new(Some(today), default_length)
                .unwrap_or_else(|_| CycleConfig::starting(today))
        })
    }

    /// Persist the settings
    pub fn save(&self, config: &CycleConfig) -> Result<()> {
        self.store.put(CONFIG_KEY, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::DEFAULT_CYCLE_LENGTH;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CycleStore::new(dir.path()).unwrap();

        let config = store.load(date(2024, 7, 10), 30);
        assert_eq!(config.last_period_date(), Some(date(2024, 7, 10)));
        assert_eq!(config.average_cycle_length(), 30);
    }

    #[test]
    fn test_zero_default_length_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let store = CycleStore::new(dir.path()).unwrap();

        let config = store.load(date(2024, 7, 10), 0);
        assert_eq!(config.average_cycle_length(), DEFAULT_CYCLE_LENGTH);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CycleStore::new(dir.path()).unwrap();

        let config = CycleConfig::new(Some(date(2024, 6, 1)), 31).unwrap();
        store.save(&config).unwrap();

        assert_eq!(store.load(date(2024, 7, 10), 28), config);
    }

    #[test]
    fn test_cleared_date_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = CycleStore::new(dir.path()).unwrap();

        let config = CycleConfig::new(None, 28).unwrap();
        store.save(&config).unwrap();

        assert_eq!(store.load(date(2024, 7, 10), 28).last_period_date(), None);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = CycleStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("cycle.json"), "garbage").unwrap();

        let config = store.load(date(2024, 7, 10), 28);
        assert_eq!(config, CycleConfig::starting(date(2024, 7, 10)));
    }
}
