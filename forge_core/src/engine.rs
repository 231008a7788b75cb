//! Plan generation engine.
//!
//! A request flows through:
//! - the split builder (muscles per day)
//! - the deterministic selector (exercises per day)
//! - the load prescriber (sets/reps/rest)
//! - the day cap, which keeps the first N in assembly order
//!
//! [`PlanService`] wraps the engine with request normalization and the
//! optional plan cache.

use crate::cache::PlanCache;
use crate::config::PlanDefaults;
use crate::prescriber::{prescribe, VolumePreset};
use crate::selector::select_for_day;
use crate::split::build_split;
use crate::{
    Day, ExerciseRepository, GeneratedPlan, Goal, Level, Location, MuscleGroup, PlanMeta,
    PlanQuery, PlanRequest, PlanResponse, Result,
};
use chrono::{DateTime, Utc};

impl PlanRequest {
    /// Normalize a raw query, filling absent fields from `defaults`
    ///
    /// Unknown values fall back to defaults rather than failing; `days` is
    /// clamped into range.
    pub fn from_query(query: &PlanQuery, defaults: &PlanDefaults) -> Self {
        let location = query
            .location
            .as_deref()
            .map(Location::from_lenient)
            .unwrap_or(defaults.location);
        let goal = query
            .goal
            .as_deref()
            .map(Goal::from_lenient)
            .unwrap_or(defaults.goal);
        let level = query
            .level
            .as_deref()
            .map(Level::from_lenient)
            .unwrap_or(defaults.level);
        let days = query.days.unwrap_or(defaults.days as i64);

        PlanRequest::new(location, goal, level, days)
    }
}

/// Day heading, e.g. "Day 2 — Back / Arms"
pub fn day_label(index: usize, muscles: &[MuscleGroup]) -> String {
    let names: Vec<&str> = muscles.iter().map(|m| m.as_str()).collect();
    format!("Day {} — {}", index + 1, names.join(" / "))
}

/// Assemble a complete plan for an already-normalized request
pub fn generate_plan<R: ExerciseRepository>(
    repository: &R,
    request: &PlanRequest,
) -> Result<GeneratedPlan> {
    let split = build_split(request.level, request.location, request.days);
    let cap = VolumePreset::for_level(request.level).day_cap;

    let mut days = Vec::with_capacity(split.len());
    for (index, muscles) in split.iter().enumerate() {
        let selected = select_for_day(repository, muscles, request)?;

        let exercises: Vec<_> = selected
            .iter()
            .take(cap)
            .map(|e| prescribe(e, request.level, request.goal))
            .collect();

        if selected.len() > cap {
            tracing::debug!(
                "Day {} trimmed from {} to {} exercises",
                index + 1,
                selected.len(),
                cap
            );
        }

        days.push(Day {
            label: day_label(index, muscles),
            exercises,
        });
    }

    tracing::info!(
        "Generated {}-day {} plan ({}, {})",
        request.days,
        request.level,
        request.goal,
        request.location
    );

    Ok(GeneratedPlan { days })
}

/// Generate-plan operation with an injected repository and cache
pub struct PlanService<R> {
    repository: R,
    cache: Option<PlanCache>,
    defaults: PlanDefaults,
}

impl<R: ExerciseRepository> PlanService<R> {
    pub fn new(repository: R, defaults: PlanDefaults) -> Self {
        Self {
            repository,
            cache: None,
            defaults,
        }
    }

    pub fn with_cache(mut self, cache: PlanCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn defaults(&self) -> &PlanDefaults {
        &self.defaults
    }

    /// Normalize `query`, then serve from cache or generate
    pub fn generate(&self, query: &PlanQuery, now: DateTime<Utc>) -> Result<PlanResponse> {
        let request = PlanRequest::from_query(query, &self.defaults);
        let meta = PlanMeta::from(&request);

        if let Some(plan) = self.cache.as_ref().and_then(|c| c.get(&request, now)) {
            return Ok(PlanResponse {
                workouts: plan,
                cached: true,
                meta,
            });
        }

        let plan = generate_plan(&self.repository, &request)?;

        if let Some(cache) = &self.cache {
            cache.insert(request, plan.clone(), now);
        }

        Ok(PlanResponse {
            workouts: plan,
            cached: false,
            meta,
        })
    }
}
