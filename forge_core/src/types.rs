//! Core domain types for the Forge system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and the muscle/equipment vocabulary
//! - Plan requests and generated plans
//! - Tasks, titles and per-user progression state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::profile::Profile;

// ============================================================================
// Exercise Vocabulary
// ============================================================================

/// Muscle group an exercise primarily trains
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 7] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Core,
        MuscleGroup::Cardio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Cardio => "Cardio",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an exercise can be performed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Equipment {
    Gym,
    Home,
    Both,
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Equipment::Gym => "Gym",
            Equipment::Home => "Home",
            Equipment::Both => "Both",
        };
        f.write_str(s)
    }
}

/// Where the user trains
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Location {
    #[default]
    Gym,
    Home,
}

impl Location {
    /// Anything other than "home" trains at the gym.
    pub fn from_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("home") {
            Location::Home
        } else {
            Location::Gym
        }
    }

    /// Whether an exercise with `equipment` can be done here
    pub fn accepts(&self, equipment: Equipment) -> bool {
        matches!(
            (self, equipment),
            (_, Equipment::Both) | (Location::Gym, Equipment::Gym) | (Location::Home, Equipment::Home)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Gym => "Gym",
            Location::Home => "Home",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body composition goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Goal {
    Bulking,
    Cutting,
    #[default]
    Maintenance,
}

impl Goal {
    /// Unrecognized goals fall back to maintenance.
    pub fn from_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bulking" => Goal::Bulking,
            "cutting" => Goal::Cutting,
            _ => Goal::Maintenance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Bulking => "Bulking",
            Goal::Cutting => "Cutting",
            Goal::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    /// Matches on prefix ("beg", "inter", "adv"), case-insensitive.
    /// Anything else is intermediate.
    pub fn from_lenient(s: &str) -> Self {
        let l = s.trim().to_lowercase();
        if l.starts_with("beg") {
            Level::Beginner
        } else if l.starts_with("adv") {
            Level::Advanced
        } else {
            Level::Intermediate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference exercise. Owned by the repository, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: Equipment,
    #[serde(default)]
    pub is_compound: bool,
}

// ============================================================================
// Plan Types
// ============================================================================

pub const MIN_DAYS: u8 = 1;
pub const MAX_DAYS: u8 = 6;

/// Raw, unvalidated plan parameters as they arrive from a caller
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanQuery {
    pub location: Option<String>,
    pub goal: Option<String>,
    pub level: Option<String>,
    pub days: Option<i64>,
}

/// Effective plan parameters after normalization
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlanRequest {
    pub location: Location,
    pub goal: Goal,
    pub level: Level,
    pub days: u8,
}

impl PlanRequest {
    pub fn new(location: Location, goal: Goal, level: Level, days: i64) -> Self {
        Self {
            location,
            goal,
            level,
            days: clamp_days(days),
        }
    }
}

/// Clamp a requested day count into the supported range
pub fn clamp_days(days: i64) -> u8 {
    days.clamp(MIN_DAYS as i64, MAX_DAYS as i64) as u8
}

/// One exercise with its load prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescribedExercise {
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: Equipment,
    pub sets: u32,
    pub reps: String,
    pub rest: String,
    pub notes: String,
}

/// A single training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Day {
    #[serde(rename = "day")]
    pub label: String,
    pub exercises: Vec<PrescribedExercise>,
}

/// Ordered list of training days
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct GeneratedPlan {
    pub days: Vec<Day>,
}

/// Parameters actually used to build a plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanMeta {
    pub location: Location,
    pub goal: Goal,
    pub level: Level,
    pub days: u8,
}

impl From<&PlanRequest> for PlanMeta {
    fn from(request: &PlanRequest) -> Self {
        Self {
            location: request.location,
            goal: request.goal,
            level: request.level,
            days: request.days,
        }
    }
}

/// Result of the generate-plan operation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub workouts: GeneratedPlan,
    pub cached: bool,
    pub meta: PlanMeta,
}

// ============================================================================
// Progression Types
// ============================================================================

/// Rank derived from accumulated points
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub enum Title {
    #[default]
    Rookie,
    Novice,
    Intermediate,
    Advanced,
    Pro,
    Elite,
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Title::Rookie => "Rookie",
            Title::Novice => "Novice",
            Title::Intermediate => "Intermediate",
            Title::Advanced => "Advanced",
            Title::Pro => "Pro",
            Title::Elite => "Elite",
        };
        f.write_str(s)
    }
}

/// Which task list a task belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// The five rotating daily tasks
    Today,
    Workouts,
    Meals,
    Meditations,
}

impl TaskCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" | "daily" => Some(TaskCategory::Today),
            "workouts" | "workout" => Some(TaskCategory::Workouts),
            "meals" | "meal" => Some(TaskCategory::Meals),
            "meditations" | "meditation" => Some(TaskCategory::Meditations),
            _ => None,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskCategory::Today => "today",
            TaskCategory::Workouts => "workouts",
            TaskCategory::Meals => "meals",
            TaskCategory::Meditations => "meditations",
        };
        f.write_str(s)
    }
}

/// A rotating daily task (flat point value)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodayTask {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

/// A task from one of the fixed lists, with its own point value
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub points: u32,
}

/// Per-user gamification state
///
/// `title` and `level` are derived from `points` and refreshed on every
/// points change; they are stored so readers don't have to recompute.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressionState {
    pub points: u32,
    pub streak: u32,
    pub title: Title,
    pub level: u32,
    #[serde(default)]
    pub today_tasks: Vec<TodayTask>,
    #[serde(default)]
    pub last_task_refresh: Option<DateTime<Utc>>,
    #[serde(default)]
    pub workouts: Vec<Task>,
    #[serde(default)]
    pub meals: Vec<Task>,
    #[serde(default)]
    pub meditations: Vec<Task>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            points: 0,
            streak: 0,
            title: Title::Rookie,
            level: 1,
            today_tasks: Vec::new(),
            last_task_refresh: None,
            workouts: Vec::new(),
            meals: Vec::new(),
            meditations: Vec::new(),
        }
    }
}

/// Everything persisted for one user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub progression: ProgressionState,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: None,
            progression: ProgressionState::default(),
        }
    }
}

// ============================================================================
// Progress Log Types
// ============================================================================

/// A body-weight/points snapshot for progress charts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub weight_kg: f64,
    pub points: u32,
}
