//! Task lists: the rotating daily tasks and the goal-based fixed lists.
//!
//! Daily tasks are refreshed lazily. Every read of the current state checks
//! whether the last draw is missing or at least 24 hours old and, if so,
//! draws five new distinct names from the pool.

use crate::{Error, Goal, ProgressionState, Result, Task, TaskCategory, TodayTask};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of daily tasks drawn per rotation
pub const DAILY_TASK_COUNT: usize = 5;

/// Default points for a task added without an explicit value
pub const DEFAULT_TASK_POINTS: u32 = 5;

/// Built-in daily task pool
pub const DEFAULT_TASK_POOL: &[&str] = &[
    "Drink 8 glasses of water",
    "Walk 8,000 steps",
    "Stretch for 10 minutes",
    "Eat two servings of vegetables",
    "Sleep at least 7 hours",
    "Do 20 push-ups",
    "Meditate for 5 minutes",
    "Log every meal",
    "Take the stairs",
    "Hold a 1-minute plank",
    "Skip sugary drinks",
    "Do 30 bodyweight squats",
    "Go for a 15-minute walk",
    "Eat a high-protein breakfast",
    "Foam roll for 5 minutes",
];

/// Trimmed, non-empty pool names in first-seen order
pub fn distinct_pool_names(pool: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(pool.len());
    for name in pool.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn rotation_period() -> Duration {
    Duration::hours(24)
}

impl ProgressionState {
    /// The fixed list for `category`; `None` for the daily rotation
    pub fn task_list(&self, category: TaskCategory) -> Option<&Vec<Task>> {
        match category {
            TaskCategory::Today => None,
            TaskCategory::Workouts => Some(&self.workouts),
            TaskCategory::Meals => Some(&self.meals),
            TaskCategory::Meditations => Some(&self.meditations),
        }
    }

    pub fn task_list_mut(&mut self, category: TaskCategory) -> Option<&mut Vec<Task>> {
        match category {
            TaskCategory::Today => None,
            TaskCategory::Workouts => Some(&mut self.workouts),
            TaskCategory::Meals => Some(&mut self.meals),
            TaskCategory::Meditations => Some(&mut self.meditations),
        }
    }

    /// Whether the daily tasks are due for a new draw at `now`
    pub fn needs_task_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_task_refresh {
            None => true,
            Some(_) if self.today_tasks.is_empty() => true,
            Some(last) => now - last >= rotation_period(),
        }
    }

    /// Replace today's tasks with a fresh draw from `pool`
    ///
    /// Names are trimmed and drawn without replacement. A pool with fewer
    /// than [`DAILY_TASK_COUNT`] distinct names is a config error and
    /// leaves the state untouched. Points already earned are kept.
    pub fn refresh_today_tasks<R: Rng + ?Sized>(
        &mut self,
        pool: &[String],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<()> {
        let names = distinct_pool_names(pool);
        if names.len() < DAILY_TASK_COUNT {
            return Err(Error::Config(format!(
                "task pool needs at least {} distinct names (got {})",
                DAILY_TASK_COUNT,
                names.len()
            )));
        }

        self.today_tasks = names
            .choose_multiple(rng, DAILY_TASK_COUNT)
            .map(|name| TodayTask {
                name: name.clone(),
                done: false,
            })
            .collect();
        self.last_task_refresh = Some(now);

        tracing::info!("Rotated daily tasks: {} drawn", self.today_tasks.len());
        Ok(())
    }

    /// Run the lazy daily rotation check; returns whether tasks were redrawn
    pub fn ensure_fresh_tasks<R: Rng + ?Sized>(
        &mut self,
        pool: &[String],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<bool> {
        if !self.needs_task_refresh(now) {
            return Ok(false);
        }
        self.refresh_today_tasks(pool, now, rng)?;
        Ok(true)
    }

    /// Set up workout/meal/meditation lists for a goal
    ///
    /// Replaces any existing fixed lists; points and streak are untouched.
    pub fn initialize_for_goal(&mut self, goal: Goal) {
        let (workout, meal) = match goal {
            Goal::Bulking => ("Weight Training", "High Protein Meal"),
            Goal::Cutting => ("Cardio", "Low Calorie Meal"),
            Goal::Maintenance => ("Moderate Training", "Balanced Meal"),
        };

        self.workouts = vec![Task {
            name: workout.into(),
            done: false,
            points: 10,
        }];
        self.meals = vec![Task {
            name: meal.into(),
            done: false,
            points: 5,
        }];
        self.meditations = vec![Task {
            name: "10 min Meditation".into(),
            done: false,
            points: 5,
        }];

        tracing::info!("Initialized task lists for {} goal", goal);
    }

    /// Append a custom task to a fixed list
    pub fn add_task(
        &mut self,
        category: TaskCategory,
        name: &str,
        points: Option<u32>,
    ) -> Result<&Task> {
        let name = name.trim();
        if name.chars().count() < 2 {
            return Err(Error::InvalidTask(format!("task name '{}' is too short", name)));
        }

        let list = self.task_list_mut(category).ok_or_else(|| {
            Error::InvalidTask("daily tasks rotate automatically and cannot be added".into())
        })?;

        list.push(Task {
            name: name.to_string(),
            done: false,
            points: points.unwrap_or(DEFAULT_TASK_POINTS),
        });

        tracing::info!("Added {} task '{}'", category, name);
        list.last()
            .ok_or_else(|| Error::State("task list empty after push".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn pool() -> Vec<String> {
        DEFAULT_TASK_POOL.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_user_gets_five_distinct_tasks() {
        let mut state = ProgressionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let now = Utc::now();

        assert!(state.ensure_fresh_tasks(&pool(), now, &mut rng).unwrap());

        assert_eq!(state.today_tasks.len(), DAILY_TASK_COUNT);
        assert!(state.today_tasks.iter().all(|t| !t.done));
        let names: HashSet<_> = state.today_tasks.iter().map(|t| &t.name).collect();
        assert_eq!(names.len(), DAILY_TASK_COUNT);
        assert_eq!(state.last_task_refresh, Some(now));
    }

    #[test]
    fn test_no_refresh_within_24_hours() {
        let mut state = ProgressionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let start = Utc::now();
        state.ensure_fresh_tasks(&pool(), start, &mut rng).unwrap();
        state.today_tasks[0].done = true;
        let before = state.today_tasks.clone();

        let refreshed =
            state.ensure_fresh_tasks(&pool(), start + Duration::hours(23), &mut rng).unwrap();
        assert!(!refreshed);
        assert_eq!(state.today_tasks, before);
        assert_eq!(state.last_task_refresh, Some(start));
    }

    #[test]
    fn test_refresh_after_24_hours() {
        let mut state = ProgressionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let start = Utc::now();
        state.ensure_fresh_tasks(&pool(), start, &mut rng).unwrap();
        state.today_tasks[0].done = true;
        state.points = 10;

        let later = start + Duration::hours(24);
        assert!(state.ensure_fresh_tasks(&pool(), later, &mut rng).unwrap());
        assert!(state.today_tasks.iter().all(|t| !t.done));
        assert_eq!(state.last_task_refresh, Some(later));
        assert_eq!(state.points, 10);
    }

    #[test]
    fn test_empty_tasks_force_refresh() {
        let state = ProgressionState {
            last_task_refresh: Some(Utc::now()),
            ..Default::default()
        };
        assert!(state.needs_task_refresh(Utc::now()));
    }

    #[test]
    fn test_duplicate_pool_names_drawn_once() {
        let mut state = ProgressionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut pool: Vec<String> = pool().into_iter().take(5).collect();
        pool.extend(pool.clone());

        state.refresh_today_tasks(&pool, Utc::now(), &mut rng).unwrap();
        let names: HashSet<_> = state.today_tasks.iter().map(|t| &t.name).collect();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_short_pool_is_rejected_and_state_kept() {
        let mut state = ProgressionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let start = Utc::now();
        state.ensure_fresh_tasks(&pool(), start, &mut rng).unwrap();
        let before = state.clone();

        let short: Vec<String> = ["a", "b", ""].iter().map(|s| s.to_string()).collect();
        let later = start + Duration::hours(25);
        assert!(matches!(
            state.ensure_fresh_tasks(&short, later, &mut rng),
            Err(Error::Config(_))
        ));
        assert_eq!(state, before);

        // Whitespace variants of one name count once
        let padded: Vec<String> = ["a", " a ", "b", "c", "d", "  "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(state.refresh_today_tasks(&padded, later, &mut rng).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_drawn_names_are_trimmed() {
        let mut state = ProgressionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let pool: Vec<String> = [" a", "b ", " c ", "d", "e", "", "a"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        state.refresh_today_tasks(&pool, Utc::now(), &mut rng).unwrap();
        let mut names: Vec<&str> = state.today_tasks.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_distinct_pool_names() {
        let pool: Vec<String> = ["x", " x", "", "y", "  ", "x "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(distinct_pool_names(&pool), vec!["x", "y"]);
    }

    #[test]
    fn test_initialize_for_goal() {
        let mut state = ProgressionState::default();
        state.initialize_for_goal(Goal::Cutting);

        assert_eq!(state.workouts[0].name, "Cardio");
        assert_eq!(state.workouts[0].points, 10);
        assert_eq!(state.meals[0].name, "Low Calorie Meal");
        assert_eq!(state.meals[0].points, 5);
        assert_eq!(state.meditations[0].name, "10 min Meditation");

        state.initialize_for_goal(Goal::Bulking);
        assert_eq!(state.workouts.len(), 1);
        assert_eq!(state.workouts[0].name, "Weight Training");
    }

    #[test]
    fn test_add_task() {
        let mut state = ProgressionState::default();

        let task = state.add_task(TaskCategory::Meals, "  Protein shake ", None).unwrap();
        assert_eq!(task.name, "Protein shake");
        assert_eq!(task.points, DEFAULT_TASK_POINTS);

        state.add_task(TaskCategory::Workouts, "Sprints", Some(15)).unwrap();
        assert_eq!(state.workouts[0].points, 15);
    }

    #[test]
    fn test_add_task_rejects_short_names_and_today() {
        let mut state = ProgressionState::default();

        assert!(matches!(
            state.add_task(TaskCategory::Meals, " x ", None),
            Err(Error::InvalidTask(_))
        ));
        assert!(matches!(
            state.add_task(TaskCategory::Today, "Walk the dog", None),
            Err(Error::InvalidTask(_))
        ));
        assert!(state.meals.is_empty());
    }
}
