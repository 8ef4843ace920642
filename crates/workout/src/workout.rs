//! Workout definitions and the user's workout catalog

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timer::{TimerConfig, TimerError};

/// Catalog errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkoutError {
    #[error("Workout not found: {0}")]
    NotFound(u64),

    #[error("Workout {0} is built in and cannot be changed")]
    NotCustom(u64),

    #[error("Workout name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Timer(#[from] TimerError),
}

/// Where the workout is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Home,
    Gym,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Gym => "gym",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" => Some(Location::Home),
            "gym" => Some(Location::Gym),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// Type of training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Cardio,
    Strength,
    Stretching,
    #[default]
    Functional,
    Yoga,
    Hypertrophy,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Cardio => "cardio",
            WorkoutKind::Strength => "strength",
            WorkoutKind::Stretching => "stretching",
            WorkoutKind::Functional => "functional",
            WorkoutKind::Yoga => "yoga",
            WorkoutKind::Hypertrophy => "hypertrophy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cardio" => Some(WorkoutKind::Cardio),
            "strength" => Some(WorkoutKind::Strength),
            "stretching" => Some(WorkoutKind::Stretching),
            "functional" => Some(WorkoutKind::Functional),
            "yoga" => Some(WorkoutKind::Yoga),
            "hypertrophy" => Some(WorkoutKind::Hypertrophy),
            _ => None,
        }
    }
}

/// A workout in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: u64,
    pub name: String,
    pub goal: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub sets: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub kind: WorkoutKind,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// An image request was in flight when this was saved
    #[serde(default)]
    pub loading_image: bool,
}

impl Workout {
    /// Timer settings stored with the workout
    pub fn timer_config(&self) -> Result<TimerConfig, TimerError> {
        TimerConfig::new(self.sets, self.work_seconds, self.rest_seconds)
    }

    /// Planned length: every set with its rest
    pub fn estimated_seconds(&self) -> u32 {
        self.sets
            .saturating_mul(self.work_seconds.saturating_add(self.rest_seconds))
    }
}

/// Fields for a new custom workout
#[derive(Debug, Clone, Default)]
pub struct NewWorkout {
    pub name: String,
    pub goal: String,
    pub location: Location,
    pub equipment: Vec<String>,
    pub sets: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub description: String,
    pub tips: Option<String>,
    pub difficulty: Difficulty,
    pub kind: WorkoutKind,
}

/// The user's workouts, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutCatalog {
    workouts: Vec<Workout>,
}

impl WorkoutCatalog {
    pub fn new(workouts: Vec<Workout>) -> Self {
        Self { workouts }
    }

    /// The built-in workouts a fresh catalog starts with
    pub fn starter() -> Self {
        let builtin = |id: u64,
                       name: &str,
                       goal: &str,
                       kind: WorkoutKind,
                       location: Location,
                       difficulty: Difficulty,
                       equipment: &[&str],
                       (sets, work_seconds, rest_seconds): (u32, u32, u32),
                       description: &str| Workout {
            id,
            name: name.to_string(),
            goal: goal.to_string(),
            location,
            equipment: equipment.iter().map(|e| e.to_string()).collect(),
            sets,
            work_seconds,
            rest_seconds,
            description: description.to_string(),
            tips: None,
            completed: false,
            difficulty,
            kind,
            is_custom: false,
            image_url: None,
            loading_image: false,
        };

        use Difficulty::*;
        use Location::*;
        Self::new(vec![
            builtin(1, "Bodyweight Legs", "Legs and glutes", WorkoutKind::Functional, Home, Beginner, &[], (3, 45, 15),
                "Bodyweight squat, lunge, glute bridge, sumo squat and single-leg deadlift."),
            builtin(2, "Core Circuit", "Core", WorkoutKind::Functional, Home, Beginner, &["mat"], (4, 30, 15),
                "Plank, crunch, leg raise, side plank and heel taps."),
            builtin(3, "Living Room Cardio", "Cardio and endurance", WorkoutKind::Cardio, Home, Intermediate, &[], (5, 40, 20),
                "Jumping jacks, running in place, low-impact burpees and imaginary jump rope."),
            builtin(4, "Dumbbell Chest and Triceps", "Chest and triceps", WorkoutKind::Strength, Gym, Intermediate,
                &["dumbbells", "bench"], (4, 45, 30),
                "Dumbbell bench press, push-ups, bench dips, dumbbell skull crushers and flyes."),
            builtin(5, "Leg Day Hypertrophy", "Legs and glutes", WorkoutKind::Hypertrophy, Gym, Advanced,
                &["barbell", "leg press"], (4, 60, 60),
                "Back squat, leg press, stiff-leg deadlift, leg extension drop set and Bulgarian split squat."),
            builtin(6, "Sun Salutation Flow", "Stretching and mobility", WorkoutKind::Yoga, Home, Beginner, &["mat"], (3, 60, 10),
                "Sun salutation, downward dog, warrior II, tree pose and savasana."),
            builtin(7, "Evening Mobility", "Stretching and mobility", WorkoutKind::Stretching, Home, Beginner, &[], (5, 30, 10),
                "Hamstring and quad stretches, pigeon pose, trunk rotations and an open-chest shoulder stretch."),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Workout, WorkoutError> {
        self.workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WorkoutError::NotFound(id))
    }

    fn next_id(&self) -> u64 {
        self.workouts.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    /// Add a custom workout at the top of the list
    pub fn add_custom(&mut self, new: NewWorkout) -> Result<&Workout, WorkoutError> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkoutError::EmptyName);
        }
        TimerConfig::new(new.sets, new.work_seconds, new.rest_seconds)?;

        let workout = Workout {
            id: self.next_id(),
            name,
            goal: new.goal,
            location: new.location,
            equipment: new.equipment,
            sets: new.sets,
            work_seconds: new.work_seconds,
            rest_seconds: new.rest_seconds,
            description: new.description,
            tips: new.tips,
            completed: false,
            difficulty: new.difficulty,
            kind: new.kind,
            is_custom: true,
            image_url: None,
            loading_image: false,
        };

        self.workouts.insert(0, workout);
        Ok(&self.workouts[0])
    }

    /// Replace a custom workout with an edited copy
    pub fn update(&mut self, updated: Workout) -> Result<(), WorkoutError> {
        if updated.name.trim().is_empty() {
            return Err(WorkoutError::EmptyName);
        }
        updated.timer_config()?;

        let slot = self.get_mut(updated.id)?;
        if !slot.is_custom {
            return Err(WorkoutError::NotCustom(updated.id));
        }
        *slot = Workout {
            is_custom: true,
            ..updated
        };
        Ok(())
    }

    /// Remove a custom workout
    pub fn delete(&mut self, id: u64) -> Result<Workout, WorkoutError> {
        let index = self
            .workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or(WorkoutError::NotFound(id))?;

        if !self.workouts[index].is_custom {
            return Err(WorkoutError::NotCustom(id));
        }
        Ok(self.workouts.remove(index))
    }

    /// Flip the completed flag; returns the new value
    pub fn toggle_completed(&mut self, id: u64) -> Result<bool, WorkoutError> {
        let workout = self.get_mut(id)?;
        workout.completed = !workout.completed;
        Ok(workout.completed)
    }

    pub fn mark_completed(&mut self, id: u64) -> Result<(), WorkoutError> {
        self.get_mut(id)?.completed = true;
        Ok(())
    }

    /// Reset workouts stuck waiting for an image; returns how many changed
    pub fn sanitize(&mut self) -> usize {
        let mut reset = 0;
        for workout in self.workouts.iter_mut().filter(|w| w.loading_image) {
            workout.loading_image = false;
            workout.image_url = None;
            reset += 1;
        }
        reset
    }

    /// (completed, total)
    pub fn progress(&self) -> (usize, usize) {
        let completed = self.workouts.iter().filter(|w| w.completed).count();
        (completed, self.workouts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squats() -> NewWorkout {
        NewWorkout {
            name: "Squats".to_string(),
            goal: "Legs and glutes".to_string(),
            sets: 3,
            work_seconds: 45,
            rest_seconds: 15,
            ..Default::default()
        }
    }

    fn builtin(id: u64) -> Workout {
        Workout {
            id,
            name: "Plank".to_string(),
            goal: "Core".to_string(),
            location: Location::Home,
            equipment: vec![],
            sets: 3,
            work_seconds: 30,
            rest_seconds: 10,
            description: String::new(),
            tips: None,
            completed: false,
            difficulty: Difficulty::Beginner,
            kind: WorkoutKind::Functional,
            is_custom: false,
            image_url: None,
            loading_image: false,
        }
    }

    #[test]
    fn test_enum_roundtrip() {
        for kind in [
            WorkoutKind::Cardio,
            WorkoutKind::Strength,
            WorkoutKind::Stretching,
            WorkoutKind::Functional,
            WorkoutKind::Yoga,
            WorkoutKind::Hypertrophy,
        ] {
            assert_eq!(WorkoutKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(Location::from_str("GYM"), Some(Location::Gym));
        assert_eq!(Difficulty::from_str("expert"), None);
    }

    #[test]
    fn test_add_custom_goes_first_with_next_id() {
        let mut catalog = WorkoutCatalog::new(vec![builtin(7)]);
        let added = catalog.add_custom(squats()).unwrap();

        assert_eq!(added.id, 8);
        assert!(added.is_custom);
        assert!(!added.completed);
        assert_eq!(catalog.iter().next().map(|w| w.id), Some(8));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_add_validates() {
        let mut catalog = WorkoutCatalog::default();
        let mut bad = squats();
        bad.name = "  ".to_string();
        assert_eq!(catalog.add_custom(bad).unwrap_err(), WorkoutError::EmptyName);

        let mut bad = squats();
        bad.sets = 0;
        assert!(matches!(catalog.add_custom(bad), Err(WorkoutError::Timer(_))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_update_and_delete_only_custom() {
        let mut catalog = WorkoutCatalog::new(vec![builtin(1)]);
        let id = catalog.add_custom(squats()).unwrap().id;

        let mut edited = catalog.get(id).unwrap().clone();
        edited.sets = 5;
        catalog.update(edited).unwrap();
        assert_eq!(catalog.get(id).unwrap().sets, 5);

        let plank = catalog.get(1).unwrap().clone();
        assert_eq!(catalog.update(plank).unwrap_err(), WorkoutError::NotCustom(1));
        assert_eq!(catalog.delete(1).unwrap_err(), WorkoutError::NotCustom(1));

        assert_eq!(catalog.delete(id).unwrap().name, "Squats");
        assert!(catalog.get(id).is_none());
        assert_eq!(catalog.delete(id).unwrap_err(), WorkoutError::NotFound(id));
    }

    #[test]
    fn test_starter_catalog_is_built_in() {
        let mut catalog = WorkoutCatalog::starter();
        assert_eq!(catalog.len(), 7);
        assert!(catalog.iter().all(|w| !w.is_custom && w.timer_config().is_ok()));
        assert_eq!(catalog.progress(), (0, 7));

        let legs = catalog.get(1).unwrap().clone();
        assert_eq!(legs.estimated_seconds(), 180);
        assert_eq!(catalog.update(legs).unwrap_err(), WorkoutError::NotCustom(1));
        assert_eq!(catalog.delete(5).unwrap_err(), WorkoutError::NotCustom(5));

        assert!(catalog.toggle_completed(6).unwrap());
        assert_eq!(catalog.add_custom(squats()).unwrap().id, 8);
    }

    #[test]
    fn test_toggle_and_mark_completed() {
        let mut catalog = WorkoutCatalog::new(vec![builtin(1)]);
        assert!(catalog.toggle_completed(1).unwrap());
        assert!(!catalog.toggle_completed(1).unwrap());

        catalog.mark_completed(1).unwrap();
        catalog.mark_completed(1).unwrap();
        assert!(catalog.get(1).unwrap().completed);
        assert_eq!(catalog.progress(), (1, 1));

        assert_eq!(catalog.mark_completed(99).unwrap_err(), WorkoutError::NotFound(99));
    }

    #[test]
    fn test_sanitize_resets_stuck_images() {
        let mut stuck = builtin(1);
        stuck.loading_image = true;
        stuck.image_url = Some("data:partial".to_string());
        let mut fine = builtin(2);
        fine.image_url = Some("https://example.com/plank.png".to_string());

        let mut catalog = WorkoutCatalog::new(vec![stuck, fine]);
        assert_eq!(catalog.sanitize(), 1);

        let first = catalog.get(1).unwrap();
        assert!(!first.loading_image);
        assert_eq!(first.image_url, None);
        assert!(catalog.get(2).unwrap().image_url.is_some());
        assert_eq!(catalog.sanitize(), 0);
    }

    #[test]
    fn test_estimated_seconds() {
        assert_eq!(builtin(1).estimated_seconds(), 120);
    }

    #[test]
    fn test_catalog_serializes_as_list() {
        let catalog = WorkoutCatalog::new(vec![builtin(1)]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));

        let parsed: WorkoutCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
