//! User profile and derived body metrics (BMI, BMR).

use crate::{Error, Goal, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const AGE_RANGE: RangeInclusive<u32> = 5..=120;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 50.0..=250.0;
/// Also bounds every weight written to the progress log
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 20.0..=300.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            "other" => Some(Sex::Other),
            _ => None,
        }
    }
}

/// Body profile used for metrics and goal-based task setup
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: Goal,
}

/// BMI and BMR for a profile
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyMetrics {
    pub bmi: f64,
    pub bmr: i64,
}

impl Profile {
    /// Check the profile against plausible human ranges
    pub fn validate(&self) -> Result<()> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(Error::InvalidProfile(format!("age {} out of range", self.age)));
        }
        if !HEIGHT_RANGE_CM.contains(&self.height_cm) {
            return Err(Error::InvalidProfile(format!(
                "height {} cm out of range",
                self.height_cm
            )));
        }
        if !WEIGHT_RANGE_KG.contains(&self.weight_kg) {
            return Err(Error::InvalidProfile(format!(
                "weight {} kg out of range",
                self.weight_kg
            )));
        }
        Ok(())
    }

    /// Body mass index, one decimal place
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        let bmi = self.weight_kg / (height_m * height_m);
        (bmi * 10.0).round() / 10.0
    }

    /// Basal metabolic rate (Mifflin-St Jeor), kcal/day
    pub fn bmr(&self) -> i64 {
        let base = 10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * self.age as f64;
        let adjusted = match self.sex {
            Sex::Male => base + 5.0,
            Sex::Female | Sex::Other => base - 161.0,
        };
        adjusted.round() as i64
    }

    pub fn metrics(&self) -> BodyMetrics {
        BodyMetrics {
            bmi: self.bmi(),
            bmr: self.bmr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            age: 30,
            sex: Sex::Male,
            height_cm: 180.0,
            weight_kg: 80.0,
            goal: Goal::Bulking,
        }
    }

    #[test]
    fn test_bmi() {
        assert_eq!(profile().bmi(), 24.7);
    }

    #[test]
    fn test_bmr_by_sex() {
        // 800 + 1125 - 150 = 1775
        assert_eq!(profile().bmr(), 1780);

        let mut female = profile();
        female.sex = Sex::Female;
        assert_eq!(female.bmr(), 1614);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(profile().validate().is_ok());

        let mut p = profile();
        p.age = 3;
        assert!(matches!(p.validate(), Err(Error::InvalidProfile(_))));

        let mut p = profile();
        p.height_cm = 260.0;
        assert!(p.validate().is_err());

        let mut p = profile();
        p.weight_kg = 10.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_parse_sex() {
        assert_eq!(Sex::parse("Female"), Some(Sex::Female));
        assert_eq!(Sex::parse("m"), Some(Sex::Male));
        assert_eq!(Sex::parse("unknown"), None);
    }
}
