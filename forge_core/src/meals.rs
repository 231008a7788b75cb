//! Meal repository and daily meal suggestions.
//!
//! Suggestions are grouped by meal type and capped per type. The order
//! within a group is a seeded shuffle keyed on the calendar date, so the
//! same day always suggests the same meals unless a regeneration is asked
//! for.

use crate::shuffle::{shuffle, Seed};
use crate::{Error, Goal, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Most meals suggested per meal type
pub const MEALS_PER_TYPE: usize = 4;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MealType {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealType {
    /// Display order of suggestion groups
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Snacks,
        MealType::Dinner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Snacks => "Snacks",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    Vegetarian,
    Vegan,
    NonVegetarian,
}

impl Diet {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "vegetarian" | "veg" => Ok(Diet::Vegetarian),
            "vegan" => Ok(Diet::Vegan),
            "non-vegetarian" | "nonvegetarian" | "non-veg" | "nonveg" => Ok(Diet::NonVegetarian),
            _ => Err(Error::UnknownValue {
                field: "diet",
                value: s.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::NonVegetarian => "non-vegetarian",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference meal with its macros
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meal {
    pub name: String,
    pub meal_type: MealType,
    pub diet: Diet,
    /// Goal this meal is built for
    pub phase: Goal,
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fats_g: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub recipe: String,
}

/// Unset fields match every meal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MealFilter {
    pub diet: Option<Diet>,
    pub phase: Option<Goal>,
}

impl MealFilter {
    pub fn matches(&self, meal: &Meal) -> bool {
        self.diet.map_or(true, |d| d == meal.diet) && self.phase.map_or(true, |p| p == meal.phase)
    }
}

/// Queryable source of reference meals
pub trait MealRepository {
    /// Meals matching `filter`, in stable repository order
    fn find_meals(&self, filter: &MealFilter) -> Result<Vec<Meal>>;
}

impl<R: MealRepository + ?Sized> MealRepository for &R {
    fn find_meals(&self, filter: &MealFilter) -> Result<Vec<Meal>> {
        (**self).find_meals(filter)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MealCatalog {
    pub meals: Vec<Meal>,
}

impl MealRepository for MealCatalog {
    fn find_meals(&self, filter: &MealFilter) -> Result<Vec<Meal>> {
        Ok(self.meals.iter().filter(|m| filter.matches(m)).cloned().collect())
    }
}

impl MealCatalog {
    pub fn new(meals: Vec<Meal>) -> Self {
        Self { meals }
    }

    /// Load meals from a JSON array
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let meals: Vec<Meal> = serde_json::from_str(&contents)
            .map_err(|e| Error::Repository(format!("Failed to parse meals {:?}: {}", path, e)))?;
        tracing::info!("Loaded {} meals from {:?}", meals.len(), path);
        Ok(Self { meals })
    }

    /// Empty list when the catalog is usable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for meal in &self.meals {
            if meal.name.trim().is_empty() {
                errors.push(format!("{} meal has empty name", meal.meal_type));
                continue;
            }
            if !seen.insert(meal.name.to_lowercase()) {
                errors.push(format!("Duplicate meal '{}'", meal.name));
            }
        }

        for meal_type in MealType::ALL {
            if !self.meals.iter().any(|m| m.meal_type == meal_type) {
                errors.push(format!("Catalog has no {} meals", meal_type));
            }
        }

        errors
    }
}

static DEFAULT_MEALS: Lazy<MealCatalog> = Lazy::new(build_default_meals);

pub fn get_default_meals() -> &'static MealCatalog {
    &DEFAULT_MEALS
}

fn meal(
    name: &str,
    meal_type: MealType,
    diet: Diet,
    phase: Goal,
    [calories, protein_g, carbs_g, fats_g]: [u32; 4],
    ingredients: &[&str],
    recipe: &str,
) -> Meal {
    Meal {
        name: name.into(),
        meal_type,
        diet,
        phase,
        calories,
        protein_g,
        carbs_g,
        fats_g,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        recipe: recipe.into(),
    }
}

/// Builds the built-in meal list
///
/// Prefer [`get_default_meals`] outside tests.
pub fn build_default_meals() -> MealCatalog {
    use Diet::{NonVegetarian, Vegan, Vegetarian};
    use Goal::{Bulking, Cutting, Maintenance};
    use MealType::*;

    let meals = vec![
        // Breakfast
        meal("Peanut Butter Banana Oats", Breakfast, Vegan, Bulking, [650, 22, 85, 24],
            &["rolled oats", "peanut butter", "banana", "soy milk"],
            "Simmer oats in soy milk, top with sliced banana and peanut butter."),
        meal("Tofu Scramble", Breakfast, Vegan, Cutting, [320, 24, 12, 18],
            &["firm tofu", "spinach", "turmeric", "bell pepper"],
            "Crumble tofu into a hot pan with turmeric, fold in spinach and peppers."),
        meal("Greek Yogurt Parfait", Breakfast, Vegetarian, Maintenance, [380, 25, 45, 10],
            &["greek yogurt", "granola", "mixed berries", "honey"],
            "Layer yogurt, granola and berries; drizzle with honey."),
        meal("Avocado Chickpea Toast", Breakfast, Vegan, Maintenance, [430, 16, 48, 20],
            &["sourdough", "avocado", "chickpeas", "lemon"],
            "Mash avocado and chickpeas with lemon, spread on toasted sourdough."),
        meal("Egg White Veggie Omelette", Breakfast, Vegetarian, Cutting, [250, 28, 10, 8],
            &["egg whites", "mushrooms", "tomato", "onion"],
            "Whisk egg whites, cook over the sauteed vegetables and fold."),
        meal("Paneer Paratha", Breakfast, Vegetarian, Bulking, [700, 28, 70, 32],
            &["whole wheat flour", "paneer", "green chilli", "ghee"],
            "Stuff dough with spiced paneer, roll out and cook on a griddle with ghee."),
        meal("Chicken Sausage Egg Wrap", Breakfast, NonVegetarian, Bulking, [620, 42, 45, 28],
            &["chicken sausage", "eggs", "tortilla", "cheddar"],
            "Brown the sausage, scramble the eggs, wrap with cheese in a warm tortilla."),
        meal("Smoked Salmon Rye Toast", Breakfast, NonVegetarian, Maintenance, [420, 30, 35, 16],
            &["rye bread", "smoked salmon", "cream cheese", "capers"],
            "Toast rye, spread cream cheese, top with salmon and capers."),
        meal("Turkey Spinach Egg Muffins", Breakfast, NonVegetarian, Cutting, [280, 30, 6, 14],
            &["eggs", "ground turkey", "spinach"],
            "Mix eggs with cooked turkey and spinach, bake in a muffin tin for 20 minutes."),
        // Lunch
        meal("Chickpea Quinoa Bowl", Lunch, Vegan, Maintenance, [520, 20, 75, 14],
            &["quinoa", "chickpeas", "cucumber", "tahini"],
            "Toss cooked quinoa and chickpeas with cucumber and a tahini dressing."),
        meal("Lentil Soup with Wholegrain Bread", Lunch, Vegan, Cutting, [410, 22, 62, 6],
            &["red lentils", "carrot", "celery", "wholegrain bread"],
            "Simmer lentils with diced vegetables until soft; serve with bread."),
        meal("Tempeh Rice Bowl", Lunch, Vegan, Bulking, [720, 38, 90, 20],
            &["tempeh", "brown rice", "edamame", "soy sauce"],
            "Pan-fry sliced tempeh in soy sauce, serve over rice with edamame."),
        meal("Caprese Wholewheat Sandwich", Lunch, Vegetarian, Maintenance, [480, 22, 50, 20],
            &["wholewheat bread", "mozzarella", "tomato", "basil"],
            "Layer mozzarella, tomato and basil between toasted bread."),
        meal("Rajma Chawal", Lunch, Vegetarian, Bulking, [680, 24, 110, 12],
            &["kidney beans", "basmati rice", "onion", "tomato"],
            "Cook kidney beans in a spiced onion-tomato gravy, serve over rice."),
        meal("Grilled Chicken Salad", Lunch, NonVegetarian, Cutting, [380, 40, 15, 16],
            &["chicken breast", "mixed greens", "olive oil", "lemon"],
            "Grill the chicken, slice over greens, dress with oil and lemon."),
        meal("Beef Burrito Bowl", Lunch, NonVegetarian, Bulking, [780, 48, 85, 24],
            &["lean ground beef", "rice", "black beans", "salsa"],
            "Brown the beef with spices, serve over rice and beans with salsa."),
        meal("Tuna Pasta Salad", Lunch, NonVegetarian, Maintenance, [540, 36, 60, 14],
            &["tuna", "wholewheat pasta", "sweetcorn", "greek yogurt"],
            "Mix cooled pasta with tuna, corn and a yogurt dressing."),
        // Snacks
        meal("Hummus with Carrot Sticks", Snacks, Vegan, Cutting, [180, 6, 20, 8],
            &["hummus", "carrots"],
            "Cut carrots into sticks and serve with hummus."),
        meal("Trail Mix", Snacks, Vegan, Bulking, [450, 12, 35, 30],
            &["almonds", "cashews", "raisins", "dark chocolate"],
            "Combine nuts, raisins and chocolate chips."),
        meal("Apple with Almond Butter", Snacks, Vegan, Maintenance, [260, 6, 30, 14],
            &["apple", "almond butter"],
            "Slice the apple and dip in almond butter."),
        meal("Cottage Cheese with Berries", Snacks, Vegetarian, Cutting, [200, 24, 16, 4],
            &["cottage cheese", "blueberries"],
            "Top cottage cheese with berries."),
        meal("Whey Banana Smoothie", Snacks, Vegetarian, Bulking, [480, 35, 55, 12],
            &["whey protein", "banana", "milk", "oats"],
            "Blend everything until smooth."),
        meal("Boiled Eggs", Snacks, NonVegetarian, Maintenance, [160, 13, 1, 11],
            &["eggs", "salt", "pepper"],
            "Boil eggs for 9 minutes, cool and season."),
        meal("Beef Jerky", Snacks, NonVegetarian, Cutting, [150, 25, 6, 3],
            &["beef jerky"],
            "Portion 50 g of jerky."),
        meal("Chicken Wrap Bites", Snacks, NonVegetarian, Bulking, [380, 30, 32, 14],
            &["chicken breast", "tortilla", "hummus", "lettuce"],
            "Roll chicken, hummus and lettuce in a tortilla and cut into pieces."),
        // Dinner
        meal("Lentil Coconut Curry", Dinner, Vegan, Maintenance, [540, 24, 70, 16],
            &["green lentils", "coconut milk", "spinach", "curry paste"],
            "Simmer lentils in coconut milk and curry paste, stir in spinach."),
        meal("Tofu Broccoli Stir-fry", Dinner, Vegan, Cutting, [360, 26, 20, 18],
            &["firm tofu", "broccoli", "garlic", "soy sauce"],
            "Stir-fry cubed tofu and broccoli with garlic and soy sauce."),
        meal("Black Bean Pasta", Dinner, Vegan, Bulking, [720, 40, 100, 14],
            &["black bean pasta", "tomato sauce", "zucchini", "nutritional yeast"],
            "Cook pasta, toss with sauce and zucchini, finish with nutritional yeast."),
        meal("Palak Paneer with Rice", Dinner, Vegetarian, Bulking, [690, 30, 70, 30],
            &["paneer", "spinach", "basmati rice", "cream"],
            "Blend cooked spinach, simmer with paneer and cream, serve with rice."),
        meal("Vegetable Frittata", Dinner, Vegetarian, Cutting, [330, 24, 12, 20],
            &["eggs", "zucchini", "feta", "red onion"],
            "Pour eggs over sauteed vegetables, add feta, finish under the grill."),
        meal("Baked Salmon with Sweet Potato", Dinner, NonVegetarian, Maintenance, [560, 38, 45, 22],
            &["salmon fillet", "sweet potato", "asparagus"],
            "Roast sweet potato for 25 minutes, add salmon and asparagus for 12 more."),
        meal("Lean Turkey Chili", Dinner, NonVegetarian, Cutting, [420, 42, 35, 10],
            &["ground turkey", "kidney beans", "tomatoes", "chili powder"],
            "Brown turkey, add beans, tomatoes and spices, simmer 30 minutes."),
        meal("Steak with Rice and Greens", Dinner, NonVegetarian, Bulking, [820, 55, 80, 28],
            &["sirloin steak", "jasmine rice", "green beans"],
            "Sear the steak to taste, rest it, serve with rice and green beans."),
    ];

    MealCatalog { meals }
}

/// Per-day seed for meal suggestions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealSeed {
    key: String,
}

impl MealSeed {
    /// Stable for the whole of `date`
    pub fn daily(date: NaiveDate) -> Self {
        Self {
            key: date.to_string(),
        }
    }

    /// A fresh draw for `date`, different per `nonce`
    pub fn regenerate(date: NaiveDate, nonce: u64) -> Self {
        Self {
            key: format!("{}-{}", date, nonce),
        }
    }

    fn for_type(&self, meal_type: MealType) -> Seed {
        Seed::from_key(&format!("{}-{}", self.key, meal_type))
    }
}

/// Suggestions for one meal type
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub meals: Vec<Meal>,
}

/// Up to [`MEALS_PER_TYPE`] matching meals per type, in type order
///
/// Types with no matching meal are left out.
pub fn suggest_meals<R: MealRepository + ?Sized>(
    repo: &R,
    filter: &MealFilter,
    seed: &MealSeed,
) -> Result<Vec<MealGroup>> {
    let found = repo.find_meals(filter)?;

    let groups: Vec<MealGroup> = MealType::ALL
        .iter()
        .filter_map(|&meal_type| {
            let candidates: Vec<Meal> = found
                .iter()
                .filter(|m| m.meal_type == meal_type)
                .cloned()
                .collect();
            if candidates.is_empty() {
                return None;
            }
            let mut meals = shuffle(candidates, seed.for_type(meal_type));
            meals.truncate(MEALS_PER_TYPE);
            Some(MealGroup { meal_type, meals })
        })
        .collect();

    tracing::debug!(
        "Suggested {} meals in {} groups for {:?}",
        groups.iter().map(|g| g.meals.len()).sum::<usize>(),
        groups.len(),
        filter
    );
    Ok(groups)
}
