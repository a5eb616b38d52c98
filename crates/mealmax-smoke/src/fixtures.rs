//! Literal data driven through the scripted run.
//!
//! The defaults reproduce the canonical run: five meals, one deletion, two
//! lookups, two combatants and a leaderboard sorted by wins. Every field can
//! be overridden from the `fixtures:` section of the config file.

use serde::{Deserialize, Serialize};

/// Difficulty levels accepted by the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Low,
    Med,
    High,
}

/// One meal to create through `/create-meal`.
///
/// Field names match the service's request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealFixture {
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
}

impl MealFixture {
    pub fn new(
        meal: impl Into<String>,
        cuisine: impl Into<String>,
        price: f64,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            meal: meal.into(),
            cuisine: cuisine.into(),
            price,
            difficulty,
        }
    }
}

/// Sort keys the leaderboard endpoint understands.
pub const LEADERBOARD_SORT_KEYS: &[&str] = &["wins", "win_pct"];

/// The complete data set for one scripted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Meals created, in order, after the kitchen is cleared.
    #[serde(default = "default_meals")]
    pub meals: Vec<MealFixture>,

    /// Meal id removed through `/delete-meal/{id}`.
    #[serde(default = "default_delete_meal_id")]
    pub delete_meal_id: u64,

    /// Name looked up through `/get-meal-by-name/{name}`.
    #[serde(default = "default_lookup_name")]
    pub lookup_name: String,

    /// Id looked up through `/get-meal-by-id/{id}`.
    #[serde(default = "default_lookup_id")]
    pub lookup_id: u64,

    /// Meal names prepped as combatants, in order.
    #[serde(default = "default_combatants")]
    pub combatants: Vec<String>,

    /// Value of the `sort` query parameter on `/leaderboard`.
    #[serde(default = "default_leaderboard_sort")]
    pub leaderboard_sort: String,
}

fn default_meals() -> Vec<MealFixture> {
    vec![
        MealFixture::new("chicken alf", "american", 17.99, Difficulty::Low),
        MealFixture::new("shakshuka", "mediterranean", 18.20, Difficulty::Med),
        MealFixture::new("coconut curry", "thai", 10.49, Difficulty::Low),
        MealFixture::new("udon", "japanese", 20.59, Difficulty::High),
        MealFixture::new("vindaloo", "indian", 30.55, Difficulty::Low),
    ]
}

fn default_delete_meal_id() -> u64 {
    1
}

fn default_lookup_name() -> String {
    "udon".to_string()
}

fn default_lookup_id() -> u64 {
    4
}

fn default_combatants() -> Vec<String> {
    vec!["udon".to_string(), "vindaloo".to_string()]
}

fn default_leaderboard_sort() -> String {
    "wins".to_string()
}

impl Default for FixtureSet {
    fn default() -> Self {
        Self {
            meals: default_meals(),
            delete_meal_id: default_delete_meal_id(),
            lookup_name: default_lookup_name(),
            lookup_id: default_lookup_id(),
            combatants: default_combatants(),
            leaderboard_sort: default_leaderboard_sort(),
        }
    }
}

impl FixtureSet {
    /// Number of HTTP calls a full run over this fixture set issues.
    ///
    /// Health, db-check, clear-meals, delete, two lookups, clear-combatants,
    /// battle, get-combatants and leaderboard are fixed; creates and preps
    /// scale with the fixture lists.
    pub fn call_count(&self) -> usize {
        10 + self.meals.len() + self.combatants.len()
    }

    /// Returns true if a meal with this name is created by the run.
    pub fn creates(&self, name: &str) -> bool {
        self.meals.iter().any(|m| m.meal == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fixtures_match_canonical_run() {
        let fixtures = FixtureSet::default();

        let names: Vec<&str> = fixtures.meals.iter().map(|m| m.meal.as_str()).collect();
        assert_eq!(
            names,
            vec!["chicken alf", "shakshuka", "coconut curry", "udon", "vindaloo"]
        );
        assert_eq!(fixtures.delete_meal_id, 1);
        assert_eq!(fixtures.lookup_name, "udon");
        assert_eq!(fixtures.lookup_id, 4);
        assert_eq!(fixtures.combatants, vec!["udon", "vindaloo"]);
        assert_eq!(fixtures.leaderboard_sort, "wins");
        assert_eq!(fixtures.call_count(), 17);
    }

    #[test]
    fn test_difficulty_serializes_upper_case() {
        let meal = MealFixture::new("udon", "japanese", 20.59, Difficulty::High);
        let json = serde_json::to_value(&meal).unwrap();

        assert_eq!(json["difficulty"], "HIGH");
        assert_eq!(json["meal"], "udon");
        assert_eq!(json["price"], 20.59);
    }

    #[test]
    fn test_difficulty_rejects_unknown_level() {
        let result: Result<Difficulty, _> = serde_yaml::from_str("BEGINNER");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
lookup_name: "shakshuka"
lookup_id: 2
"#;
        let fixtures: FixtureSet = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(fixtures.lookup_name, "shakshuka");
        assert_eq!(fixtures.lookup_id, 2);
        assert_eq!(fixtures.meals.len(), 5);
        assert_eq!(fixtures.combatants.len(), 2);
    }

    #[test]
    fn test_creates_checks_meal_names() {
        let fixtures = FixtureSet::default();
        assert!(fixtures.creates("coconut curry"));
        assert!(!fixtures.creates("pad thai"));
    }
}
