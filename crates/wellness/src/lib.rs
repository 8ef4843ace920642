//! wellness - Sleep, mood and challenges
//!
//! Commands:
//! - summary: Recent sleep, mood counts and challenge progress
//! - sleep HOURS: Log last night's sleep (one entry per date)
//! - mood MOOD: Log how you feel right now
//! - challenges: Show challenge progress
//! - progress ID: Count one step towards a challenge
//! - challenge-add: Create a custom challenge

pub mod challenge;
pub mod mood;
pub mod sleep;
pub mod store;

use thiserror::Error;

pub use challenge::{Challenge, ChallengeBoard, ChallengeKind};
pub use mood::{Mood, MoodEntry, MoodLog};
pub use sleep::{SleepEntry, SleepLog};
pub use store::WellnessStore;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WellnessError {
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Challenge not found: {0}")]
    ChallengeNotFound(u64),
}
