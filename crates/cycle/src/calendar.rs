//! Phase projection onto a calendar month
//!
//! Cycles repeat every `average_cycle_length` days in both directions from
//! the recorded last period date. To paint a month we find the cycle start
//! (the anchor) on or before the 1st that is less than one cycle length
//! before it, then lay out whole cycles from there until the anchor moves
//! past the end of the month. Days outside the month are dropped.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::phase::{CycleConfig, CycleError, CyclePhase};

/// Projected phase for every covered day of one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthProjection {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<NaiveDate, CyclePhase>,
}

impl MonthProjection {
    /// Phase projected for `date`, if any
    pub fn phase_on(&self, date: NaiveDate) -> Option<CyclePhase> {
        self.days.get(&date).copied()
    }

    /// All dates tagged with `phase`, in order
    pub fn dates_in(&self, phase: CyclePhase) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|(_, p)| **p == phase)
            .map(|(d, _)| *d)
            .collect()
    }

    /// The projection keyed by ISO date string (YYYY-MM-DD)
    pub fn to_iso_map(&self) -> BTreeMap<String, CyclePhase> {
        self.days
            .iter()
            .map(|(d, p)| (d.format("%Y-%m-%d").to_string(), *p))
            .collect()
    }
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CycleError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CycleError::InvalidMonth(format!("{}-{:02}", year, month)))?;

    let (next_year, next_month) = next_month(year, month);
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| CycleError::InvalidMonth(format!("{}-{:02}", year, month)))?;

    Ok((first, last))
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Parse "YYYY-MM"
pub fn parse_month(input: &str) -> Result<(i32, u32), CycleError> {
    let invalid = || CycleError::InvalidMonth(input.to_string());

    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    month_bounds(year, month).map_err(|_| invalid())?;
    Ok((year, month))
}

/// Project phase bands from `config` onto the given month
///
/// Without a last period date nothing is projected.
pub fn project_month(config: &CycleConfig, year: i32, month: u32) -> Result<MonthProjection, CycleError> {
    let (first, last) = month_bounds(year, month)?;
    let mut days = BTreeMap::new();

    if let Some(last_period) = config.last_period_date() {
        let length = i64::from(config.average_cycle_length());

        // Latest cycle start on or before the 1st of the month
        let cycles = (first - last_period).num_days().div_euclid(length);
        let mut anchor = last_period + Duration::days(cycles * length);

        while anchor <= last {
            for offset in 0..length {
                let day = anchor + Duration::days(offset);
                if day.year() == year && day.month() == month {
                    days.insert(day, CyclePhase::for_day(offset + 1, config.average_cycle_length()));
                }
            }
            anchor += Duration::days(length);
        }
    }

    Ok(MonthProjection { year, month, days })
}

/// Calendar rows for a month, weeks starting on Sunday
pub fn weeks(year: i32, month: u32) -> Result<Vec<[Option<NaiveDate>; 7]>, CycleError> {
    let (first, last) = month_bounds(year, month)?;

    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut column = first.weekday().num_days_from_sunday() as usize;
    let mut day = first;

    while day <= last {
        row[column] = Some(day);
        column += 1;
        if column == 7 || day == last {
            rows.push(row);
            row = [None; 7];
            column = 0;
        }
        day += Duration::days(1);
    }

    Ok(rows)
}

/// Weekday headers matching `weeks`
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(last: NaiveDate, length: u32) -> CycleConfig {
        CycleConfig::new(Some(last), length).unwrap()
    }

    #[test]
    fn test_month_containing_last_period() {
        let projection = project_month(&config(date(2024, 7, 10), 28), 2024, 7).unwrap();

        assert_eq!(projection.days.len(), 31);
        assert_eq!(projection.phase_on(date(2024, 7, 10)), Some(CyclePhase::Menstruation));
        assert_eq!(projection.phase_on(date(2024, 7, 14)), Some(CyclePhase::Menstruation));
        assert_eq!(projection.phase_on(date(2024, 7, 15)), Some(CyclePhase::Follicular));
        assert_eq!(projection.phase_on(date(2024, 7, 23)), Some(CyclePhase::Ovulatory));
        assert_eq!(projection.phase_on(date(2024, 7, 24)), Some(CyclePhase::Ovulatory));
        assert_eq!(projection.phase_on(date(2024, 7, 25)), Some(CyclePhase::Luteal));
        // Days before the recorded period belong to the previous projected cycle
        assert_eq!(projection.phase_on(date(2024, 7, 9)), Some(CyclePhase::Luteal));
        assert_eq!(projection.phase_on(date(2024, 7, 1)), Some(CyclePhase::Luteal));
        assert_eq!(projection.phase_on(date(2024, 6, 30)), None);
    }

    #[test]
    fn test_second_cycle_in_same_month() {
        let projection = project_month(&config(date(2024, 7, 1), 28), 2024, 7).unwrap();

        let period = projection.dates_in(CyclePhase::Menstruation);
        assert_eq!(
            period,
            vec![
                date(2024, 7, 1),
                date(2024, 7, 2),
                date(2024, 7, 3),
                date(2024, 7, 4),
                date(2024, 7, 5),
                date(2024, 7, 29),
                date(2024, 7, 30),
                date(2024, 7, 31),
            ]
        );
    }

    #[test]
    fn test_cycle_spanning_month_boundary() {
        let projection = project_month(&config(date(2024, 7, 29), 28), 2024, 8).unwrap();

        assert_eq!(projection.phase_on(date(2024, 8, 1)), Some(CyclePhase::Menstruation));
        assert_eq!(projection.phase_on(date(2024, 8, 2)), Some(CyclePhase::Menstruation));
        assert_eq!(projection.phase_on(date(2024, 8, 3)), Some(CyclePhase::Follicular));
        assert_eq!(projection.days.len(), 31);
    }

    #[test]
    fn test_month_long_before_last_period() {
        let last = date(2024, 7, 10);
        let projection = project_month(&config(last, 28), 2023, 2).unwrap();

        assert_eq!(projection.days.len(), 28);
        // Walking back whole cycles from the recorded date
        for (day, phase) in &projection.days {
            let offset = (*day - last).num_days().rem_euclid(28) + 1;
            assert_eq!(*phase, CyclePhase::for_day(offset, 28), "{}", day);
        }
        assert!(!projection.dates_in(CyclePhase::Menstruation).is_empty());
    }

    #[test]
    fn test_month_long_after_last_period() {
        let last = date(2020, 1, 1);
        let projection = project_month(&config(last, 30), 2024, 12).unwrap();

        assert_eq!(projection.days.len(), 31);
        for (day, phase) in &projection.days {
            let offset = (*day - last).num_days().rem_euclid(30) + 1;
            assert_eq!(*phase, CyclePhase::for_day(offset, 30), "{}", day);
        }
    }

    #[test]
    fn test_anchor_on_first_of_month() {
        let projection = project_month(&config(date(2024, 5, 4), 28), 2024, 6).unwrap();
        // 2024-06-01 is exactly one cycle after 2024-05-04
        assert_eq!(projection.phase_on(date(2024, 6, 1)), Some(CyclePhase::Menstruation));
        assert_eq!(projection.phase_on(date(2024, 6, 29)), Some(CyclePhase::Menstruation));
    }

    #[test]
    fn test_short_cycle_covers_month() {
        let projection = project_month(&config(date(2024, 2, 20), 7), 2024, 2).unwrap();

        assert_eq!(projection.days.len(), 29);
        assert!(projection.dates_in(CyclePhase::Ovulatory).is_empty());
        assert!(projection.dates_in(CyclePhase::Luteal).is_empty());
    }

    #[test]
    fn test_long_cycle_longer_than_month() {
        let projection = project_month(&config(date(2024, 1, 15), 45), 2024, 2).unwrap();
        assert_eq!(projection.days.len(), 29);
        assert_eq!(projection.phase_on(date(2024, 2, 28)), Some(CyclePhase::Luteal));
        assert_eq!(projection.phase_on(date(2024, 2, 29)), Some(CyclePhase::Menstruation));
    }

    #[test]
    fn test_never_projects_unknown() {
        let projection = project_month(&config(date(2024, 7, 10), 28), 2024, 9).unwrap();
        assert!(projection.dates_in(CyclePhase::Unknown).is_empty());
    }

    #[test]
    fn test_without_date_projects_nothing() {
        let config = CycleConfig::new(None, 28).unwrap();
        let projection = project_month(&config, 2024, 7).unwrap();
        assert!(projection.days.is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let config = config(date(2024, 3, 17), 31);
        let first = project_month(&config, 2024, 11).unwrap();
        let second = project_month(&config, 2024, 11).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_iso_map(), second.to_iso_map());
    }

    #[test]
    fn test_iso_map_keys() {
        let projection = project_month(&config(date(2024, 7, 10), 28), 2024, 7).unwrap();
        let map = projection.to_iso_map();
        assert_eq!(map.get("2024-07-10"), Some(&CyclePhase::Menstruation));
        assert_eq!(map.len(), 31);
    }

    #[test]
    fn test_invalid_month() {
        let config = config(date(2024, 7, 10), 28);
        assert!(matches!(project_month(&config, 2024, 13), Err(CycleError::InvalidMonth(_))));
        assert!(project_month(&config, 2024, 0).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-07").unwrap(), (2024, 7));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("july").is_err());
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(prev_month(2024, 1), (2023, 12));
        assert_eq!(next_month(2024, 6), (2024, 7));
    }

    #[test]
    fn test_weeks_layout() {
        // July 2024 starts on a Monday
        let rows = weeks(2024, 7).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0][0], None);
        assert_eq!(rows[0][1], Some(date(2024, 7, 1)));
        assert_eq!(rows[4][3], Some(date(2024, 7, 31)));
        assert_eq!(rows[4][4], None);

        let count: usize = rows.iter().map(|r| r.iter().flatten().count()).sum();
        assert_eq!(count, 31);
    }
}
