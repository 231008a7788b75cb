//! Exercise repository and the built-in exercise catalog.
//!
//! The plan generator only talks to [`ExerciseRepository`]; the catalog is
//! the default in-process implementation.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

/// Queryable source of reference exercises
pub trait ExerciseRepository {
    /// Exercises whose muscle group is in `muscles` and whose equipment is
    /// usable at `location`, in stable repository order.
    fn find_exercises(&self, muscles: &[MuscleGroup], location: Location) -> Result<Vec<Exercise>>;
}

/// Ordered, immutable collection of exercises
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
}

impl ExerciseRepository for Catalog {
    fn find_exercises(&self, muscles: &[MuscleGroup], location: Location) -> Result<Vec<Exercise>> {
        Ok(self
            .exercises
            .iter()
            .filter(|e| muscles.contains(&e.muscle_group) && location.accepts(e.equipment))
            .cloned()
            .collect())
    }
}

impl<R: ExerciseRepository + ?Sized> ExerciseRepository for &R {
    fn find_exercises(&self, muscles: &[MuscleGroup], location: Location) -> Result<Vec<Exercise>> {
        (**self).find_exercises(muscles, location)
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn ex(name: &str, muscle_group: MuscleGroup, equipment: Equipment, is_compound: bool) -> Exercise {
    Exercise {
        name: name.into(),
        muscle_group,
        equipment,
        is_compound,
    }
}

/// Builds the built-in exercise list
///
/// Prefer [`get_default_catalog`] outside tests.
pub fn build_default_catalog() -> Catalog {
    use Equipment::{Both, Gym, Home};
    use MuscleGroup::*;

    let exercises = vec![
        // Chest
        ex("Barbell Bench Press", Chest, Gym, true),
        ex("Incline Dumbbell Press", Chest, Gym, true),
        ex("Weighted Dips", Chest, Gym, true),
        ex("Push-ups", Chest, Both, true),
        ex("Decline Push-ups", Chest, Home, true),
        ex("Cable Fly", Chest, Gym, false),
        ex("Pec Deck", Chest, Gym, false),
        ex("Incline Push-ups", Chest, Home, false),
        ex("Floor Dumbbell Fly", Chest, Home, false),
        ex("Svend Press", Chest, Both, false),
        // Back
        ex("Deadlift", Back, Gym, true),
        ex("Bent Over Row", Back, Gym, true),
        ex("Lat Pulldown", Back, Gym, true),
        ex("Seated Cable Row", Back, Gym, true),
        ex("Pull-ups", Back, Both, true),
        ex("Inverted Row", Back, Home, true),
        ex("Straight-Arm Pulldown", Back, Gym, false),
        ex("Dumbbell Pullover", Back, Gym, false),
        ex("Superman Hold", Back, Home, false),
        ex("Band Pull-Apart", Back, Both, false),
        // Legs
        ex("Barbell Squat", Legs, Gym, true),
        ex("Leg Press", Legs, Gym, true),
        ex("Romanian Deadlift", Legs, Gym, true),
        ex("Lunges", Legs, Both, true),
        ex("Bulgarian Split Squat", Legs, Both, true),
        ex("Bodyweight Squats", Legs, Home, true),
        ex("Leg Extension", Legs, Gym, false),
        ex("Lying Leg Curl", Legs, Gym, false),
        ex("Standing Calf Raise", Legs, Both, false),
        ex("Glute Bridge", Legs, Home, false),
        ex("Wall Sit", Legs, Home, false),
        // Shoulders
        ex("Overhead Press", Shoulders, Gym, true),
        ex("Seated Dumbbell Press", Shoulders, Gym, true),
        ex("Arnold Press", Shoulders, Both, true),
        ex("Pike Push-ups", Shoulders, Home, true),
        ex("Lateral Raise", Shoulders, Gym, false),
        ex("Face Pull", Shoulders, Gym, false),
        ex("Rear Delt Fly", Shoulders, Both, false),
        ex("Front Raise", Shoulders, Both, false),
        ex("Band Lateral Raise", Shoulders, Home, false),
        // Arms
        ex("Close-Grip Bench Press", Arms, Gym, true),
        ex("Chin-ups", Arms, Both, true),
        ex("Diamond Push-ups", Arms, Home, true),
        ex("Chair Dips", Arms, Home, true),
        ex("Dumbbell Curl", Arms, Gym, false),
        ex("Tricep Rope Pushdown", Arms, Gym, false),
        ex("Hammer Curl", Arms, Both, false),
        ex("Overhead Tricep Extension", Arms, Both, false),
        ex("Towel Curl", Arms, Home, false),
        // Core
        ex("Ab Wheel Rollout", Core, Both, true),
        ex("Cable Woodchopper", Core, Gym, true),
        ex("Mountain Climbers", Core, Home, true),
        ex("Plank", Core, Both, false),
        ex("Hanging Leg Raises", Core, Gym, false),
        ex("Cable Crunch", Core, Gym, false),
        ex("Russian Twist", Core, Both, false),
        ex("Crunches", Core, Home, false),
        // Cardio
        ex("Rowing Machine", Cardio, Gym, true),
        ex("Burpees", Cardio, Home, true),
        ex("Jump Rope", Cardio, Both, false),
        ex("Treadmill Run", Cardio, Gym, false),
    ];

    Catalog { exercises }
}

impl Catalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    /// Load a catalog from a JSON array of exercises
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let exercises: Vec<Exercise> = serde_json::from_str(&contents)
            .map_err(|e| Error::Repository(format!("Failed to parse catalog {:?}: {}", path, e)))?;
        tracing::info!("Loaded {} exercises from {:?}", exercises.len(), path);
        Ok(Self { exercises })
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.name.trim().is_empty() {
                errors.push(format!(
                    "{} exercise has empty name",
                    exercise.muscle_group
                ));
                continue;
            }
            if !seen.insert(exercise.name.to_lowercase()) {
                errors.push(format!("Duplicate exercise '{}'", exercise.name));
            }
        }

        // Every group the split builder can target needs at least one entry
        for muscle in MuscleGroup::ALL {
            if muscle == MuscleGroup::Cardio {
                continue;
            }
            if !self.exercises.iter().any(|e| e.muscle_group == muscle) {
                errors.push(format!("Catalog has no {} exercises", muscle));
            }
        }

        errors
    }
}
