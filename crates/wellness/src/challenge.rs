//! Challenges
//!
//! A challenge counts up from zero to its goal, one step per `progress`.
//! Progress never passes the goal; a challenge at its goal is complete.

use serde::{Deserialize, Serialize};

use crate::WellnessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    #[default]
    Predefined,
    Custom,
}

impl ChallengeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Predefined => "predefined",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub kind: ChallengeKind,
    pub goal_value: u32,
    pub current_value: u32,
    /// What is counted ("days", "workouts")
    pub unit: String,
}

impl Challenge {
    /// Progress as a percentage, capped at 100
    pub fn percent(&self) -> u32 {
        if self.goal_value == 0 {
            return 100;
        }
        let percent = u64::from(self.current_value) * 100 / u64::from(self.goal_value);
        percent.min(100) as u32
    }

    pub fn is_completed(&self) -> bool {
        self.percent() >= 100
    }
}

/// The set of challenges being tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeBoard {
    challenges: Vec<Challenge>,
}

impl Default for ChallengeBoard {
    fn default() -> Self {
        Self::new(vec![
            predefined(1, "Hydration Week", "Drink 8 glasses of water every day for 7 days in a row.", 7, 3, "days"),
            predefined(2, "3 Workouts This Week", "Complete 3 workouts of any kind during the week.", 3, 1, "workouts"),
            predefined(3, "5 Restful Nights", "Sleep at least 7 hours a night, 5 times this week.", 5, 4, "nights"),
        ])
    }
}

fn predefined(id: u64, title: &str, description: &str, goal_value: u32, current_value: u32, unit: &str) -> Challenge {
    Challenge {
        id,
        title: title.to_string(),
        description: description.to_string(),
        kind: ChallengeKind::Predefined,
        goal_value,
        current_value,
        unit: unit.to_string(),
    }
}

impl ChallengeBoard {
    pub fn new(challenges: Vec<Challenge>) -> Self {
        Self { challenges }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    pub fn get(&self, id: u64) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Count one step towards challenge `id`, clamped to its goal
    pub fn progress(&mut self, id: u64) -> Result<&Challenge, WellnessError> {
        let challenge = self
            .challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(WellnessError::ChallengeNotFound(id))?;
        challenge.current_value = challenge.current_value.saturating_add(1).min(challenge.goal_value);
        Ok(&*challenge)
    }

    /// Add a custom challenge starting at zero
    pub fn add_custom(
        &mut self,
        title: &str,
        description: &str,
        goal_value: u32,
        unit: &str,
    ) -> Result<&Challenge, WellnessError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(WellnessError::InvalidEntry("challenge title cannot be empty".to_string()));
        }
        if goal_value == 0 {
            return Err(WellnessError::InvalidEntry("challenge goal must be at least 1".to_string()));
        }

        let id = self.challenges.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        self.challenges.push(Challenge {
            id,
            title: title.to_string(),
            description: description.trim().to_string(),
            kind: ChallengeKind::Custom,
            goal_value,
            current_value: 0,
            unit: unit.trim().to_string(),
        });
        Ok(&self.challenges[self.challenges.len() - 1])
    }

    /// (completed, total)
    pub fn completed(&self) -> (usize, usize) {
        let done = self.challenges.iter().filter(|c| c.is_completed()).count();
        (done, self.challenges.len())
    }
}
