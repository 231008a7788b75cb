//! Points, streak, title and level transitions.
//!
//! Completing a task adds its points and extends the streak; un-completing
//! takes both back. Neither points nor streak go below zero. Title and
//! level are always recomputed from points.

use crate::{Error, ProgressionState, Result, TaskCategory, Title};
use serde::{Deserialize, Serialize};

/// Points per level
const POINTS_PER_LEVEL: u32 = 100;

/// Title thresholds, highest first
const TITLE_THRESHOLDS: [(u32, Title); 5] = [
    (1000, Title::Elite),
    (700, Title::Pro),
    (400, Title::Advanced),
    (200, Title::Intermediate),
    (100, Title::Novice),
];

pub fn title_for_points(points: u32) -> Title {
    TITLE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| points >= *threshold)
        .map(|(_, title)| *title)
        .unwrap_or(Title::Rookie)
}

pub fn level_for_points(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// Aggregate state after a toggle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub category: TaskCategory,
    pub index: usize,
    pub task: String,
    pub done: bool,
    pub points: u32,
    pub streak: u32,
    pub title: Title,
    pub level: u32,
}

impl ProgressionState {
    /// Recompute title and level from points
    pub fn refresh_derived(&mut self) {
        self.title = title_for_points(self.points);
        self.level = level_for_points(self.points);
    }

    /// Apply the effect of a task flipping to `done` (or back)
    pub fn record_completion(&mut self, task_points: u32, done: bool) {
        if done {
            self.points = self.points.saturating_add(task_points);
            self.streak = self.streak.saturating_add(1);
        } else {
            self.points = self.points.saturating_sub(task_points);
            self.streak = self.streak.saturating_sub(1);
        }
        self.refresh_derived();
    }

    /// Flip a task between pending and done
    ///
    /// Today tasks are worth `daily_points`; the fixed lists carry their own
    /// values. An out-of-range index leaves the state untouched.
    pub fn toggle_task(
        &mut self,
        category: TaskCategory,
        index: usize,
        daily_points: u32,
    ) -> Result<ToggleOutcome> {
        let (name, done, task_points) = match category {
            TaskCategory::Today => {
                let task = self
                    .today_tasks
                    .get_mut(index)
                    .ok_or(Error::TaskNotFound { category, index })?;
                task.done = !task.done;
                (task.name.clone(), task.done, daily_points)
            }
            TaskCategory::Workouts | TaskCategory::Meals | TaskCategory::Meditations => {
                let task = self
                    .task_list_mut(category)
                    .and_then(|tasks| tasks.get_mut(index))
                    .ok_or(Error::TaskNotFound { category, index })?;
                task.done = !task.done;
                (task.name.clone(), task.done, task.points)
            }
        };

        self.record_completion(task_points, done);

        tracing::info!(
            "Toggled {} task '{}' -> {} ({} points, streak {}, {} level {})",
            category,
            name,
            if done { "done" } else { "pending" },
            self.points,
            self.streak,
            self.title,
            self.level
        );

        Ok(ToggleOutcome {
            category,
            index,
            task: name,
            done,
            points: self.points,
            streak: self.streak,
            title: self.title,
            level: self.level,
        })
    }
}
