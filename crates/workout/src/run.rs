//! Active and finished timer runs
//!
//! An `ActiveRun` is what other invocations of the tool see while a timer is
//! counting down; a `RunRecord` is what is kept in history once it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerRun;
use crate::workout::Workout;

/// A run in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRun {
    /// Identifies the process driving the timer
    #[serde(default)]
    pub owner: String,
    pub workout_id: u64,
    pub workout_name: String,
    /// When the run started (Unix timestamp)
    pub start: i64,
    /// Latest timer state
    pub timer: TimerRun,
}

impl ActiveRun {
    pub fn new(workout: &Workout, timer: TimerRun) -> Self {
        let now = Utc::now();
        Self {
            owner: format!("{}-{}-{}", std::process::id(), now.timestamp(), now.timestamp_subsec_nanos()),
            workout_id: workout.id,
            workout_name: workout.name.clone(),
            start: now.timestamp(),
            timer,
        }
    }

    /// Get the start time as a DateTime
    pub fn start_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.start, 0).unwrap_or_else(Utc::now)
    }
}

/// A finished run (stored in history)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub workout_id: u64,
    pub workout_name: String,
    /// When the run started (Unix timestamp)
    pub start: i64,
    /// When the run ended (Unix timestamp)
    pub end: i64,
    /// Set the timer was in when it ended
    pub sets_reached: u32,
    pub total_sets: u32,
    /// Seconds actually counted down
    pub active_seconds: u32,
    /// Whether the workout counted as done (naturally or finished early)
    pub completed: bool,
}

impl RunRecord {
    /// Create a history record from an active run and the timer's final state
    pub fn from_run(active: &ActiveRun, last: &TimerRun, completed: bool) -> Self {
        Self {
            workout_id: active.workout_id,
            workout_name: active.workout_name.clone(),
            start: active.start,
            end: Utc::now().timestamp().max(active.start),
            sets_reached: last.current_set,
            total_sets: last.config.total_sets,
            active_seconds: last.elapsed_seconds,
            completed,
        }
    }

    /// Get the start time as a DateTime
    pub fn start_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.start, 0).unwrap_or_else(Utc::now)
    }
}
