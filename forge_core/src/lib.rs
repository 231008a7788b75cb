#![forbid(unsafe_code)]

//! Core domain model and business logic for Forge.
//!
//! This crate provides:
//! - Domain types (exercises, plans, tasks, progression)
//! - Exercise catalog and repository seam
//! - Deterministic plan generation with a TTL cache
//! - Daily meal suggestions
//! - Gamified progression (points, streak, title, level, daily tasks)
//! - Persistence (user record, progress WAL, CSV archive)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod profile;
pub mod split;
pub mod shuffle;
pub mod selector;
pub mod prescriber;
pub mod cache;
pub mod engine;
pub mod progression;
pub mod tasks;
pub mod state;
pub mod wal;
pub mod csv_rollup;
pub mod history;
pub mod meals;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use profile::{BodyMetrics, Profile, Sex};
pub use catalog::{build_default_catalog, get_default_catalog, Catalog, ExerciseRepository};
pub use config::{Config, PlanDefaults};
pub use cache::PlanCache;
pub use engine::{generate_plan, PlanService};
pub use progression::ToggleOutcome;
pub use wal::{JsonlSink, ProgressSink};
pub use csv_rollup::RollupReport;
pub use history::load_recent_entries;
pub use meals::{get_default_meals, suggest_meals, Diet, Meal, MealCatalog, MealFilter, MealRepository, MealSeed, MealType};
