//! Split builder: which muscle groups are trained on which day.
//!
//! Pure and deterministic. The same (level, location, days) always yields
//! the same day-by-day assignment.

use crate::{Level, Location, MuscleGroup};

use MuscleGroup::{Arms, Back, Chest, Core, Legs, Shoulders};

const BEGINNER_CYCLE: [MuscleGroup; 6] = [Chest, Back, Legs, Shoulders, Arms, Core];

const PAIR_CYCLE: [&[MuscleGroup]; 6] = [
    &[Chest, Arms],
    &[Back, Arms],
    &[Legs, Shoulders],
    &[Chest, Arms],
    &[Back, Arms],
    &[Legs, Shoulders],
];

/// Push / pull / legs template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PplDay {
    Push,
    Pull,
    Legs,
}

impl PplDay {
    pub fn muscles(&self) -> &'static [MuscleGroup] {
        match self {
            PplDay::Push => &[Chest, Shoulders, Arms],
            PplDay::Pull => &[Back, Arms],
            PplDay::Legs => &[Legs, Core],
        }
    }
}

const PPL_CYCLE: [PplDay; 3] = [PplDay::Push, PplDay::Pull, PplDay::Legs];

/// Gym and home currently share every table.
fn beginner_cycle(location: Location) -> &'static [MuscleGroup] {
    match location {
        Location::Gym | Location::Home => &BEGINNER_CYCLE,
    }
}

fn pair_cycle(location: Location) -> &'static [&'static [MuscleGroup]] {
    match location {
        Location::Gym | Location::Home => &PAIR_CYCLE,
    }
}

/// Muscle groups for a single day of a `days`-day plan
///
/// `days` must already be clamped; it only matters for the advanced
/// four-day special case.
pub fn muscles_for_day(
    level: Level,
    location: Location,
    day_index: usize,
    days: u8,
) -> Vec<MuscleGroup> {
    match level {
        Level::Beginner => {
            let cycle = beginner_cycle(location);
            vec![cycle[day_index % cycle.len()]]
        }
        Level::Intermediate => {
            let cycle = pair_cycle(location);
            cycle[day_index % cycle.len()].to_vec()
        }
        // Four advanced days run the upper/lower-style pair cycle instead of PPL
        Level::Advanced if days == 4 => {
            let cycle = pair_cycle(location);
            cycle[day_index % cycle.len()].to_vec()
        }
        Level::Advanced => PPL_CYCLE[day_index % PPL_CYCLE.len()].muscles().to_vec(),
    }
}

/// Build the full split: one non-empty muscle list per day
pub fn build_split(level: Level, location: Location, days: u8) -> Vec<Vec<MuscleGroup>> {
    let split: Vec<Vec<MuscleGroup>> = (0..days as usize)
        .map(|i| muscles_for_day(level, location, i, days))
        .collect();

    tracing::debug!(
        "Built {} split for {} days at {}: {:?}",
        level,
        days,
        location,
        split
    );

    split
}
