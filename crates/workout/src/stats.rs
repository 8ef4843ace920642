//! Workout statistics calculation
//!
//! Aggregates finished runs by outcome (ran to the end, finished early,
//! abandoned), by sets actually reached and by workout.

use std::collections::BTreeMap;

use crate::run::RunRecord;

/// Aggregated workout statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStats {
    pub total_runs: u32,
    /// Runs whose timer counted every set to the end
    pub full_runs: u32,
    /// Runs ended with "finish" before the last set ran out
    pub finished_early: u32,
    /// Runs stopped without counting as done
    pub abandoned: u32,
    /// Done runs (full or finished early) as percentage (0-100)
    pub completion_rate: u32,
    /// Total seconds counted down
    pub total_seconds: u32,
    /// Sets reached out of sets planned, over all runs (0-100)
    pub set_rate: u32,
    /// Mean sets reached per run
    pub average_sets: f32,
    /// Workout run most often, with its run count
    pub favorite: Option<(String, u32)>,
}

impl WorkoutStats {
    /// Calculate statistics from finished runs
    pub fn from_records(records: &[RunRecord]) -> Self {
        let mut stats = Self::default();
        let mut sets_reached = 0u32;
        let mut sets_planned = 0u32;
        let mut per_workout: BTreeMap<&str, u32> = BTreeMap::new();

        for record in records {
            stats.total_runs += 1;
            stats.total_seconds += record.active_seconds;

            // A run stopped mid-set has not finished that set
            let reached = if record.completed && record.sets_reached >= record.total_sets {
                stats.full_runs += 1;
                record.total_sets
            } else if record.completed {
                stats.finished_early += 1;
                record.sets_reached
            } else {
                stats.abandoned += 1;
                record.sets_reached.saturating_sub(1)
            };
            sets_reached += reached.min(record.total_sets);
            sets_planned += record.total_sets;

            *per_workout.entry(record.workout_name.as_str()).or_default() += 1;
        }

        if stats.total_runs == 0 {
            return stats;
        }

        stats.completion_rate = ((stats.full_runs + stats.finished_early) * 100) / stats.total_runs;
        stats.set_rate = if sets_planned == 0 { 0 } else { sets_reached * 100 / sets_planned };
        stats.average_sets = sets_reached as f32 / stats.total_runs as f32;
        // Ties go to the name that sorts first
        stats.favorite = per_workout
            .into_iter()
            .fold(None, |best: Option<(&str, u32)>, (name, count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((name, count)),
            })
            .map(|(name, count)| (name.to_string(), count));

        stats
    }

    /// Average active seconds per run
    pub fn average_seconds(&self) -> u32 {
        self.total_seconds.checked_div(self.total_runs).unwrap_or(0)
    }

    /// Total active time as (hours, minutes)
    pub fn total_time(&self) -> (u32, u32) {
        let minutes = self.total_seconds / 60;
        (minutes / 60, minutes % 60)
    }
}
