//! workout - Interval timer and workout catalog
//!
//! "Work, rest, repeat. Never rest after the last set."
//!
//! Provides:
//! - A catalog of workouts with sets, work and rest durations
//! - A work/rest countdown timer driven once per second
//! - History of finished runs and statistics over it
//!
//! Commands:
//! - list: Show the catalog
//! - add / edit / delete: Manage custom workouts
//! - done ID: Toggle a workout's completed flag
//! - run ID: Count a workout down in the terminal
//! - status: Show the run in progress
//! - stop: End the run in progress
//! - stats [DAYS]: Show workout statistics

pub mod run;
pub mod stats;
pub mod store;
pub mod timer;
pub mod workout;

pub use run::{ActiveRun, RunRecord};
pub use stats::WorkoutStats;
pub use store::WorkoutStore;
pub use timer::{Phase, StopMode, Tick, TimerConfig, TimerError, TimerRun, WorkoutTimer};
pub use workout::{Workout, WorkoutCatalog, WorkoutError};
