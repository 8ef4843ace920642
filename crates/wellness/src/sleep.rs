//! Sleep log
//!
//! One entry per calendar date. Logging a date again replaces the earlier
//! entry instead of adding a second one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::WellnessError;

pub const MIN_ENERGY: u8 = 1;
pub const MAX_ENERGY: u8 = 5;
pub const DEFAULT_ENERGY: u8 = 3;

/// A night of sleep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub date: NaiveDate,
    pub hours_slept: f32,
    /// How rested you felt, 1 (drained) to 5 (energized)
    pub energy_level: u8,
}

impl SleepEntry {
    pub fn new(date: NaiveDate, hours_slept: f32, energy_level: u8) -> Result<Self, WellnessError> {
        if !hours_slept.is_finite() || !(0.0..=24.0).contains(&hours_slept) {
            return Err(WellnessError::InvalidEntry(format!(
                "hours slept must be between 0 and 24, got {}",
                hours_slept
            )));
        }
        if !(MIN_ENERGY..=MAX_ENERGY).contains(&energy_level) {
            return Err(WellnessError::InvalidEntry(format!(
                "energy level must be between {} and {}, got {}",
                MIN_ENERGY, MAX_ENERGY, energy_level
            )));
        }

        Ok(Self {
            date,
            hours_slept,
            energy_level,
        })
    }
}

/// All sleep entries, kept sorted by date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SleepLog {
    entries: Vec<SleepEntry>,
}

impl SleepLog {
    /// Insert or replace the entry for `entry.date`
    ///
    /// Returns true when an existing entry was replaced.
    pub fn log(&mut self, entry: SleepEntry) -> bool {
        match self.entries.binary_search_by_key(&entry.date, |e| e.date) {
            Ok(i) => {
                self.entries[i] = entry;
                true
            }
            Err(i) => {
                self.entries.insert(i, entry);
                false
            }
        }
    }

    /// Restore date order after loading hand-edited data
    pub fn normalize(&mut self) {
        self.entries.sort_by_key(|e| e.date);
        self.entries.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                *earlier = later.clone();
                true
            } else {
                false
            }
        });
    }

    pub fn entries(&self) -> &[SleepEntry] {
        &self.entries
    }

    pub fn get(&self, date: NaiveDate) -> Option<&SleepEntry> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[SleepEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Average hours over `entries`
    pub fn average_hours(entries: &[SleepEntry]) -> Option<f32> {
        if entries.is_empty() {
            return None;
        }
        let total: f32 = entries.iter().map(|e| e.hours_slept).sum();
        Some(total / entries.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_entry_validation() {
        assert!(SleepEntry::new(date(1), 7.5, 4).is_ok());
        assert!(SleepEntry::new(date(1), 0.0, 1).is_ok());
        assert!(SleepEntry::new(date(1), 24.0, 5).is_ok());

        assert!(matches!(
            SleepEntry::new(date(1), 25.0, 3),
            Err(WellnessError::InvalidEntry(_))
        ));
        assert!(SleepEntry::new(date(1), -1.0, 3).is_err());
        assert!(SleepEntry::new(date(1), f32::NAN, 3).is_err());
        assert!(SleepEntry::new(date(1), 7.0, 0).is_err());
        assert!(SleepEntry::new(date(1), 7.0, 6).is_err());
    }

    #[test]
    fn test_log_upserts_by_date() {
        let mut log = SleepLog::default();
        assert!(!log.log(SleepEntry::new(date(26), 6.0, 2).unwrap()));
        assert!(!log.log(SleepEntry::new(date(25), 7.5, 4).unwrap()));
        assert!(log.log(SleepEntry::new(date(26), 8.0, 5).unwrap()));

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].date, date(25));
        assert_eq!(log.get(date(26)).unwrap().hours_slept, 8.0);
        assert_eq!(log.get(date(26)).unwrap().energy_level, 5);
    }

    #[test]
    fn test_recent_and_average() {
        let mut log = SleepLog::default();
        for (d, h) in [(25, 7.5), (26, 6.0), (27, 8.0), (28, 7.0)] {
            log.log(SleepEntry::new(date(d), h, 3).unwrap());
        }

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date(27));
        assert_eq!(log.recent(10).len(), 4);

        assert_eq!(SleepLog::average_hours(recent), Some(7.5));
        assert_eq!(SleepLog::average_hours(&[]), None);
    }

    #[test]
    fn test_normalize_keeps_last_duplicate() {
        let json = r#"[
            {"date": "2024-07-27", "hours_slept": 8.0, "energy_level": 5},
            {"date": "2024-07-25", "hours_slept": 6.0, "energy_level": 2},
            {"date": "2024-07-27", "hours_slept": 5.0, "energy_level": 1}
        ]"#;
        let mut log: SleepLog = serde_json::from_str(json).unwrap();
        log.normalize();

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].date, date(25));
        assert_eq!(log.get(date(27)).unwrap().hours_slept, 5.0);
    }
}
