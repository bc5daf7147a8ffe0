use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PlannerError;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// A generated recipe. Only `image_url` changes after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub cooking_time: String,
    pub difficulty: u8,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cuisine: String,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub is_eco_friendly: bool,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub cooking_method: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Recipe {
    /// Plain-text rendering for sharing through chat or mail.
    pub fn share_text(&self) -> String {
        let steps = self
            .instructions
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nIngredienser:\n{}\n\nInstruktioner:\n{}\n\nTillagningstid: {}\nSvårighetsgrad: {}/{}",
            self.name,
            self.ingredients.join("\n"),
            steps,
            self.cooking_time,
            self.difficulty,
            MAX_DIFFICULTY
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealPlanType {
    #[serde(rename = "En dag")]
    SingleDay,
    #[serde(rename = "Helg")]
    Weekend,
    #[serde(rename = "Vecka med lyxig helgmeny")]
    WeekWithLuxuryWeekend,
}

impl MealPlanType {
    pub const ALL: [MealPlanType; 3] = [
        MealPlanType::SingleDay,
        MealPlanType::Weekend,
        MealPlanType::WeekWithLuxuryWeekend,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealPlanType::SingleDay => "En dag",
            MealPlanType::Weekend => "Helg",
            MealPlanType::WeekWithLuxuryWeekend => "Vecka med lyxig helgmeny",
        }
    }

    pub fn recipe_count(&self) -> usize {
        match self {
            MealPlanType::SingleDay => 1,
            MealPlanType::Weekend => 2,
            MealPlanType::WeekWithLuxuryWeekend => 7,
        }
    }
}

impl fmt::Display for MealPlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealPlanType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(plan) = Self::ALL.iter().find(|plan| plan.label() == trimmed) {
            return Ok(*plan);
        }
        match trimmed.to_lowercase().as_str() {
            "day" | "single-day" => Ok(MealPlanType::SingleDay),
            "weekend" => Ok(MealPlanType::Weekend),
            "week" | "luxury-week" => Ok(MealPlanType::WeekWithLuxuryWeekend),
            _ => Err(PlannerError::Validation(format!(
                "unknown meal plan type '{}'",
                s
            ))),
        }
    }
}

/// User-chosen constraints for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub is_eco_friendly: bool,
    #[serde(default)]
    pub occasion: String,
    pub meal_plan_type: MealPlanType,
    #[serde(default)]
    pub cooking_method: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default)]
    pub cooking_time: String,
}

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

impl FilterOptions {
    pub fn new(meal_plan_type: MealPlanType) -> Self {
        Self {
            cuisine: String::new(),
            diets: Vec::new(),
            is_eco_friendly: false,
            occasion: String::new(),
            meal_plan_type,
            cooking_method: String::new(),
            difficulty: default_difficulty(),
            cooking_time: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(PlannerError::Validation(format!(
                "difficulty must be between {} and {}, got {}",
                MIN_DIFFICULTY, MAX_DIFFICULTY, self.difficulty
            )));
        }
        Ok(())
    }
}

/// A recipe (by position in the generated list) planned for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRecipe {
    pub recipe_index: usize,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealSchedule {
    entries: Vec<ScheduledRecipe>,
}

impl MealSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        recipes: &[Recipe],
        recipe_index: usize,
        date: NaiveDate,
    ) -> Result<&ScheduledRecipe, PlannerError> {
        if recipe_index >= recipes.len() {
            return Err(PlannerError::Validation(format!(
                "recipe index {} out of range ({} recipes)",
                recipe_index,
                recipes.len()
            )));
        }
        self.entries.push(ScheduledRecipe { recipe_index, date });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[ScheduledRecipe] {
        &self.entries
    }

    pub fn on<'a>(&'a self, date: NaiveDate) -> impl Iterator<Item = &'a ScheduledRecipe> + 'a {
        self.entries.iter().filter(move |entry| entry.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            cooking_time: "30 min".to_string(),
            difficulty: 2,
            ingredients: vec!["2 dl mjölk".to_string(), "vitlök".to_string()],
            instructions: vec!["Koka".to_string(), "Servera".to_string()],
            cuisine: "Svenskt".to_string(),
            diets: vec![],
            is_eco_friendly: true,
            occasion: "Vardag".to_string(),
            cooking_method: "Spis".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn meal_plan_type_parses_labels_and_aliases() {
        assert_eq!("Helg".parse::<MealPlanType>().unwrap(), MealPlanType::Weekend);
        assert_eq!(
            "Vecka med lyxig helgmeny".parse::<MealPlanType>().unwrap(),
            MealPlanType::WeekWithLuxuryWeekend
        );
        assert_eq!("week".parse::<MealPlanType>().unwrap(), MealPlanType::WeekWithLuxuryWeekend);
        assert!(matches!(
            "Månad".parse::<MealPlanType>(),
            Err(PlannerError::Validation(_))
        ));
    }

    #[test]
    fn filter_options_use_camel_case_wire_names() {
        let json = r#"{"cuisine":"Italienskt","diets":["Vegetariskt"],"isEcoFriendly":true,
            "occasion":"Fest","mealPlanType":"Helg","cookingMethod":"Ugn","difficulty":4,
            "cookingTime":"30-45 min"}"#;
        let filters: FilterOptions = serde_json::from_str(json).unwrap();
        assert_eq!(filters.meal_plan_type, MealPlanType::Weekend);
        assert!(filters.is_eco_friendly);
        assert_eq!(filters.cooking_method, "Ugn");
    }

    #[test]
    fn unknown_meal_plan_type_is_rejected_by_serde() {
        let json = r#"{"mealPlanType":"Månad"}"#;
        assert!(serde_json::from_str::<FilterOptions>(json).is_err());
    }

    #[test]
    fn difficulty_out_of_range_fails_validation() {
        let mut filters = FilterOptions::new(MealPlanType::SingleDay);
        filters.difficulty = 9;
        assert!(filters.validate().is_err());
    }

    #[test]
    fn recipe_share_text_numbers_steps() {
        let text = recipe("Pannkakor").share_text();
        assert!(text.starts_with("Pannkakor\n\nIngredienser:\n2 dl mjölk\nvitlök"));
        assert!(text.contains("1. Koka\n2. Servera"));
        assert!(text.ends_with("Svårighetsgrad: 2/5"));
    }

    #[test]
    fn schedule_rejects_unknown_recipe() {
        let recipes = vec![recipe("A"), recipe("B")];
        let mut schedule = MealSchedule::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(schedule.schedule(&recipes, 1, date).is_ok());
        assert!(schedule.schedule(&recipes, 2, date).is_err());
        assert_eq!(schedule.entries().len(), 1);
        assert_eq!(schedule.on(date).count(), 1);
    }
}
