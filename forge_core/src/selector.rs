//! Deterministic exercise selection for one training day.

use crate::prescriber::VolumePreset;
use crate::shuffle::{shuffle, Seed};
use crate::{Exercise, ExerciseRepository, MuscleGroup, PlanRequest, Result};

/// Volume multiplier for days that train two or more muscle groups
const MULTI_MUSCLE_FACTOR: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bucket {
    Compound,
    Isolation,
}

impl Bucket {
    fn tag(&self) -> &'static str {
        match self {
            Bucket::Compound => "c",
            Bucket::Isolation => "i",
        }
    }
}

/// Seed key for one (muscle, bucket) under a request
fn seed_key(muscle: MuscleGroup, bucket: Bucket, request: &PlanRequest) -> String {
    format!(
        "{}-{}-{}-{}-{}-{}",
        muscle,
        bucket.tag(),
        request.level,
        request.goal,
        request.location,
        request.days
    )
}

/// Compound/isolation counts per muscle for a day with `muscle_count` targets
pub fn counts_for_day(preset: &VolumePreset, muscle_count: usize) -> (usize, usize) {
    if muscle_count >= 2 {
        let scale = |n: usize| ((n as f64 * MULTI_MUSCLE_FACTOR).round() as usize).max(1);
        (scale(preset.compounds), scale(preset.isolations))
    } else {
        (preset.compounds, preset.isolations)
    }
}

/// Select exercises for one day's target muscles
///
/// Output is grouped by muscle in `targets` order, compounds before
/// isolations within each muscle. A muscle with no matches contributes
/// nothing.
pub fn select_for_day<R: ExerciseRepository>(
    repository: &R,
    targets: &[MuscleGroup],
    request: &PlanRequest,
) -> Result<Vec<Exercise>> {
    let matches = repository.find_exercises(targets, request.location)?;
    let preset = VolumePreset::for_level(request.level);
    let (n_compounds, n_isolations) = counts_for_day(&preset, targets.len());

    let mut selected = Vec::new();
    for &muscle in targets {
        let (compounds, isolations): (Vec<Exercise>, Vec<Exercise>) = matches
            .iter()
            .filter(|e| e.muscle_group == muscle)
            .cloned()
            .partition(|e| e.is_compound);

        if compounds.is_empty() && isolations.is_empty() {
            tracing::warn!("No {} exercises available at {}", muscle, request.location);
            continue;
        }

        let compounds = shuffle(
            compounds,
            Seed::from_key(&seed_key(muscle, Bucket::Compound, request)),
        );
        let isolations = shuffle(
            isolations,
            Seed::from_key(&seed_key(muscle, Bucket::Isolation, request)),
        );

        let before = selected.len();
        selected.extend(compounds.into_iter().take(n_compounds));
        selected.extend(isolations.into_iter().take(n_isolations));

        tracing::debug!(
            "Selected {} exercises for {}",
            selected.len() - before,
            muscle
        );
    }

    Ok(selected)
}
