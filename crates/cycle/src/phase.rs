//! Cycle configuration and phase classification
//!
//! Phase bands are fixed offsets into the cycle (day 1 = first day of the
//! period):
//! - Menstruation: days 1-5
//! - Follicular: days 6-13
//! - Ovulatory: days 14-15
//! - Luteal: day 16 to the average cycle length

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Average cycle length assumed when none is known
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// Cycle-specific errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CycleError {
    #[error("Invalid cycle configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),
}

/// Phase of the menstrual cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstruation,
    Follicular,
    Ovulatory,
    Luteal,
    /// No last period date, or a date in the future
    Unknown,
}

impl CyclePhase {
    /// Classify a 1-indexed day of the cycle
    ///
    /// Days past `cycle_length` are read as the start of a new, unrecorded
    /// period and classified as `Menstruation`.
    pub fn for_day(day_in_cycle: i64, cycle_length: u32) -> Self {
        match day_in_cycle {
            d if d <= 0 => CyclePhase::Unknown,
            1..=5 => CyclePhase::Menstruation,
            6..=13 => CyclePhase::Follicular,
            14..=15 => CyclePhase::Ovulatory,
            d if d <= i64::from(cycle_length) => CyclePhase::Luteal,
            _ => CyclePhase::Menstruation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Menstruation => "menstruation",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulatory => "ovulatory",
            CyclePhase::Luteal => "luteal",
            CyclePhase::Unknown => "unknown",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            CyclePhase::Menstruation => "Menstruation",
            CyclePhase::Follicular => "Follicular",
            CyclePhase::Ovulatory => "Ovulation",
            CyclePhase::Luteal => "Luteal",
            CyclePhase::Unknown => "Unknown",
        }
    }

    /// One-line suggestion for training and self care in this phase
    pub fn guidance(&self) -> &'static str {
        match self {
            CyclePhase::Menstruation => "Energy is lower. Favor gentle movement, stretching and rest.",
            CyclePhase::Follicular => "Energy is rising. A good time to try new or harder workouts.",
            CyclePhase::Ovulatory => "Peak energy and strength. Go for intensity if you feel like it.",
            CyclePhase::Luteal => "Energy tapers off. Keep workouts moderate and prioritize sleep.",
            CyclePhase::Unknown => "Set the date of your last period to see your phase.",
        }
    }
}

/// Persisted cycle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCycleConfig")]
pub struct CycleConfig {
    last_period_date: Option<NaiveDate>,
    average_cycle_length: u32,
}

#[derive(Deserialize)]
struct RawCycleConfig {
    last_period_date: Option<NaiveDate>,
    average_cycle_length: u32,
}

impl TryFrom<RawCycleConfig> for CycleConfig {
    type Error = CycleError;

    fn try_from(raw: RawCycleConfig) -> Result<Self, Self::Error> {
        CycleConfig::new(raw.last_period_date, raw.average_cycle_length)
    }
}

impl CycleConfig {
    /// Create a config, rejecting a zero cycle length
    pub fn new(last_period_date: Option<NaiveDate>, average_cycle_length: u32) -> Result<Self, CycleError> {
        if average_cycle_length == 0 {
            return Err(CycleError::InvalidConfig(
                "average cycle length must be at least 1 day".to_string(),
            ));
        }

        Ok(Self {
            last_period_date,
            average_cycle_length,
        })
    }

    /// Config with the period starting on `date` and the default length
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            last_period_date: Some(date),
            average_cycle_length: DEFAULT_CYCLE_LENGTH,
        }
    }

    pub fn last_period_date(&self) -> Option<NaiveDate> {
        self.last_period_date
    }

    pub fn average_cycle_length(&self) -> u32 {
        self.average_cycle_length
    }

    /// Copy with a different last period date
    pub fn with_last_period(&self, date: Option<NaiveDate>) -> Self {
        Self {
            last_period_date: date,
            average_cycle_length: self.average_cycle_length,
        }
    }

    /// Copy with a different length, rejecting zero
    pub fn with_length(&self, average_cycle_length: u32) -> Result<Self, CycleError> {
        Self::new(self.last_period_date, average_cycle_length)
    }
}

/// Parse a user-entered cycle length, using the default when it is not a
/// positive number
pub fn parse_cycle_length(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_CYCLE_LENGTH,
    }
}

/// Cycle position for a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseReading {
    /// 1-indexed day since the last period start; 0 when unknown
    pub day_in_cycle: i64,
    pub phase: CyclePhase,
}

/// Where `today` falls in the cycle described by `config`
pub fn current_phase(config: &CycleConfig, today: NaiveDate) -> PhaseReading {
    let last = match config.last_period_date {
        Some(date) => date,
        None => {
            return PhaseReading {
                day_in_cycle: 0,
                phase: CyclePhase::Unknown,
            }
        }
    };

    let day_in_cycle = (today - last).num_days() + 1;

    PhaseReading {
        day_in_cycle,
        phase: CyclePhase::for_day(day_in_cycle, config.average_cycle_length),
    }
}

/// Today's date in UTC, the reference day for all cycle arithmetic
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
