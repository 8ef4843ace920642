//! Interval timer for a workout: work and rest phases across sets
//!
//! The timer is a plain value advanced by an external once-per-second tick.
//! A run always starts and ends on a work phase; there is no rest after the
//! final set. Completion is reported back to the caller as a tick or stop
//! result, the timer itself knows nothing about workouts.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Timer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("A workout timer is already running")]
    AlreadyActive,

    #[error("Invalid timer settings: {0}")]
    InvalidConfig(String),
}

/// Sets and durations for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub total_sets: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
}

impl TimerConfig {
    /// Create a config; every value must be at least 1
    pub fn new(total_sets: u32, work_seconds: u32, rest_seconds: u32) -> Result<Self, TimerError> {
        let config = Self {
            total_sets,
            work_seconds,
            rest_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        if self.total_sets == 0 {
            return Err(TimerError::InvalidConfig("sets must be at least 1".to_string()));
        }
        if self.work_seconds == 0 {
            return Err(TimerError::InvalidConfig("work time must be at least 1 second".to_string()));
        }
        if self.rest_seconds == 0 {
            return Err(TimerError::InvalidConfig("rest time must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Planned length as shown to the user: every set with its rest
    pub fn estimated_seconds(&self) -> u32 {
        self.total_sets
            .saturating_mul(self.work_seconds.saturating_add(self.rest_seconds))
    }
}

/// Countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "WORK",
            Phase::Rest => "REST",
        }
    }
}

/// State of an active run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRun {
    pub config: TimerConfig,
    pub phase: Phase,
    /// 1-indexed, never above `config.total_sets`
    pub current_set: u32,
    pub remaining_seconds: u32,
    pub paused: bool,
    /// Seconds actually counted down (paused ticks excluded)
    #[serde(default)]
    pub elapsed_seconds: u32,
}

impl TimerRun {
    fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Work,
            current_set: 1,
            remaining_seconds: config.work_seconds,
            paused: false,
            elapsed_seconds: 0,
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// No run active; nothing changed
    Idle,
    /// Run is paused; nothing changed
    Paused,
    /// Same phase, one second less
    Counting { remaining: u32 },
    /// Work phase of `set` ended, rest begins
    RestStarted { set: u32 },
    /// Rest ended, work for `set` begins
    WorkStarted { set: u32 },
    /// Work phase of the last set ended; the timer is idle again
    Completed(TimerRun),
}

/// How a run is stopped by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Leave the workout as it was
    Abandon,
    /// Count the workout as done even though sets remain
    FinishEarly,
}

/// Result of stopping an active run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopped {
    pub run: TimerRun,
    pub completed: bool,
}

/// Owner of at most one active run
#[derive(Debug, Clone, Default)]
pub struct WorkoutTimer {
    run: Option<TimerRun>,
}

impl WorkoutTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run; fails if one is already active
    pub fn start(&mut self, config: TimerConfig) -> Result<&TimerRun, TimerError> {
        if self.run.is_some() {
            return Err(TimerError::AlreadyActive);
        }
        config.validate()?;

        debug!(
            "Timer started: {} sets, {}s work, {}s rest",
            config.total_sets, config.work_seconds, config.rest_seconds
        );
        Ok(self.run.insert(TimerRun::new(config)))
    }

    /// Advance the run by one second
    pub fn tick(&mut self) -> Tick {
        let Some(run) = self.run.as_mut() else {
            return Tick::Idle;
        };
        if run.paused {
            return Tick::Paused;
        }

        run.elapsed_seconds = run.elapsed_seconds.saturating_add(1);

        if run.remaining_seconds > 1 {
            run.remaining_seconds -= 1;
            return Tick::Counting {
                remaining: run.remaining_seconds,
            };
        }

        // The last set's work phase ends the run before any rest is scheduled
        if run.phase == Phase::Work && run.current_set >= run.config.total_sets {
            run.remaining_seconds = 0;
            let finished = run.clone();
            self.run = None;
            debug!("Timer completed after {}s", finished.elapsed_seconds);
            return Tick::Completed(finished);
        }

        match run.phase {
            Phase::Work => {
                run.phase = Phase::Rest;
                run.remaining_seconds = run.config.rest_seconds;
                debug!("Set {} done, resting", run.current_set);
                Tick::RestStarted {
                    set: run.current_set,
                }
            }
            Phase::Rest => {
                run.current_set += 1;
                run.phase = Phase::Work;
                run.remaining_seconds = run.config.work_seconds;
                debug!("Starting set {}", run.current_set);
                Tick::WorkStarted {
                    set: run.current_set,
                }
            }
        }
    }

    /// Pause the run; returns whether anything changed
    pub fn pause(&mut self) -> bool {
        self.set_paused(true)
    }

    /// Resume the run; returns whether anything changed
    pub fn resume(&mut self) -> bool {
        self.set_paused(false)
    }

    /// Flip between paused and running; returns the new paused state
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let run = self.run.as_mut()?;
        run.paused = !run.paused;
        Some(run.paused)
    }

    fn set_paused(&mut self, paused: bool) -> bool {
        match self.run.as_mut() {
            Some(run) if run.paused != paused => {
                run.paused = paused;
                true
            }
            _ => false,
        }
    }

    /// End the run now. Stopping an idle timer does nothing.
    pub fn stop(&mut self, mode: StopMode) -> Option<Stopped> {
        let run = self.run.take()?;
        debug!("Timer stopped ({:?}) in set {}", mode, run.current_set);
        Some(Stopped {
            run,
            completed: mode == StopMode::FinishEarly,
        })
    }

    /// The active run, if any
    pub fn run(&self) -> Option<&TimerRun> {
        self.run.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.run.as_ref().map_or(false, |r| r.paused)
    }
}
