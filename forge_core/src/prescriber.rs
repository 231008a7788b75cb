//! Load prescription: sets, reps and rest per exercise.

use crate::{Exercise, Goal, Level, PrescribedExercise};

pub const COACHING_NOTE: &str = "Progressive overload. Keep 1–3 reps in reserve.";

/// Rest for compound lifts at the advanced level, regardless of preset
const ADVANCED_COMPOUND_REST_SECONDS: u32 = 120;

/// Level-dependent volume bundle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumePreset {
    pub compounds: usize,
    pub isolations: usize,
    pub sets: u32,
    pub rest_seconds: u32,
    /// Maximum exercises kept per day after assembly
    pub day_cap: usize,
}

impl VolumePreset {
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Beginner => VolumePreset {
                compounds: 1,
                isolations: 2,
                sets: 3,
                rest_seconds: 60,
                day_cap: 6,
            },
            Level::Intermediate => VolumePreset {
                compounds: 2,
                isolations: 3,
                sets: 4,
                rest_seconds: 75,
                day_cap: 7,
            },
            Level::Advanced => VolumePreset {
                compounds: 3,
                isolations: 3,
                sets: 5,
                rest_seconds: 90,
                day_cap: 8,
            },
        }
    }
}

/// Rep range for a goal
pub fn reps_for(goal: Goal, is_compound: bool) -> &'static str {
    match (goal, is_compound) {
        (Goal::Bulking, true) => "6-10",
        (Goal::Bulking, false) => "8-12",
        (Goal::Cutting, _) => "12-20",
        (Goal::Maintenance, true) => "6-10",
        (Goal::Maintenance, false) => "8-15",
    }
}

/// Rest interval for a level
pub fn rest_for(level: Level, is_compound: bool) -> String {
    let seconds = if is_compound && level == Level::Advanced {
        ADVANCED_COMPOUND_REST_SECONDS
    } else {
        VolumePreset::for_level(level).rest_seconds
    };
    format!("{}s", seconds)
}

/// Attach a load prescription to a selected exercise
pub fn prescribe(exercise: &Exercise, level: Level, goal: Goal) -> PrescribedExercise {
    PrescribedExercise {
        name: exercise.name.clone(),
        muscle_group: exercise.muscle_group,
        equipment: exercise.equipment,
        sets: VolumePreset::for_level(level).sets,
        reps: reps_for(goal, exercise.is_compound).to_string(),
        rest: rest_for(level, exercise.is_compound),
        notes: COACHING_NOTE.to_string(),
    }
}
