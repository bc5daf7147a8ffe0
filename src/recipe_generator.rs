use chrono::Weekday;

use crate::api_connection::{GenerativeClient, TextRequest};
use crate::config::GenerationConfig;
use crate::errors::{GenerationError, PlannerError};
use crate::recipe_parser::parse_recipe_response;
use crate::types::{FilterOptions, MealPlanType, Recipe};

const RECIPE_SYSTEM_PROMPT: &str = "Du är en professionell kock som skapar unika recept. Varje recept ska vara distinkt och annorlunda från andra recept. Svara endast med JSON-data enligt det specificerade formatet.";

const RECIPE_FORMAT: &str = r#"{
  "name": "Rättens namn",
  "cookingTime": "Tillagningstid",
  "difficulty": numeriskt värde mellan 1 och 5,
  "ingredients": ["ingrediens 1", "ingrediens 2"],
  "instructions": ["steg 1", "steg 2"],
  "cuisine": "typ av kök",
  "diets": ["kosthållning1", "kosthållning2"],
  "isEcoFriendly": true/false,
  "occasion": "tillfälle",
  "cookingMethod": "tillagningsmetod"
}"#;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One dinner to generate within a meal plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealSlot {
    pub index: usize,
    pub day: Option<Weekday>,
    pub luxury: bool,
}

pub fn swedish_day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "måndag",
        Weekday::Tue => "tisdag",
        Weekday::Wed => "onsdag",
        Weekday::Thu => "torsdag",
        Weekday::Fri => "fredag",
        Weekday::Sat => "lördag",
        Weekday::Sun => "söndag",
    }
}

impl MealSlot {
    /// Sentence placing this dinner within the plan; empty for a single day.
    pub fn context(&self) -> String {
        match self.day {
            None => String::new(),
            Some(day) => format!(
                "Detta är en {}middag för {}.",
                if self.luxury { "lyxig " } else { "" },
                swedish_day_name(day)
            ),
        }
    }
}

/// Slots for a meal plan, in generation order.
pub fn plan_slots(meal_plan_type: MealPlanType) -> Vec<MealSlot> {
    match meal_plan_type {
        MealPlanType::SingleDay => vec![MealSlot {
            index: 0,
            day: None,
            luxury: false,
        }],
        MealPlanType::Weekend => [Weekday::Sat, Weekday::Sun]
            .into_iter()
            .enumerate()
            .map(|(index, day)| MealSlot {
                index,
                day: Some(day),
                luxury: false,
            })
            .collect(),
        MealPlanType::WeekWithLuxuryWeekend => WEEK
            .into_iter()
            .enumerate()
            .map(|(index, day)| MealSlot {
                index,
                day: Some(day),
                luxury: index >= 5,
            })
            .collect(),
    }
}

fn constraint_lines(filters: &FilterOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if !filters.cuisine.is_empty() {
        lines.push(format!("Kök: {}", filters.cuisine));
    }
    if !filters.diets.is_empty() {
        lines.push(format!("Kosthållning: {}", filters.diets.join(", ")));
    }
    if filters.is_eco_friendly {
        lines.push("Receptet ska vara miljövänligt.".to_string());
    }
    if !filters.occasion.is_empty() {
        lines.push(format!("Tillfälle: {}", filters.occasion));
    }
    if !filters.cooking_method.is_empty() {
        lines.push(format!("Tillagningsmetod: {}", filters.cooking_method));
    }
    lines.push(format!("Svårighetsgrad: {} av 5", filters.difficulty));
    if !filters.cooking_time.is_empty() {
        lines.push(format!("Tillagningstid: {}", filters.cooking_time));
    }
    lines
}

/// Build the user prompt for one slot. Names of earlier recipes in the same
/// plan are listed so the model avoids repeating them.
pub fn build_recipe_prompt(filters: &FilterOptions, slot: &MealSlot, earlier: &[Recipe]) -> String {
    let mut prompt = String::from("Skapa ett recept för en middag.");
    let context = slot.context();
    if !context.is_empty() {
        prompt.push('\n');
        prompt.push_str(&context);
    }

    for line in constraint_lines(filters) {
        prompt.push('\n');
        prompt.push_str(&line);
    }

    if !earlier.is_empty() {
        let names = earlier
            .iter()
            .map(|recipe| recipe.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!("\nUndvik dessa rätter som redan finns i planen: {}", names));
    }

    prompt.push_str(&format!(
        "\n\nSkapa ett unikt recept som inte liknar tidigare recept.\nReturnera svaret i följande format (endast JSON, inga andra förklaringar):\n\n{}",
        RECIPE_FORMAT
    ));
    prompt
}

async fn generate_slot(
    client: &dyn GenerativeClient,
    config: &GenerationConfig,
    filters: &FilterOptions,
    slot: &MealSlot,
    earlier: &[Recipe],
) -> Result<Recipe, GenerationError> {
    let request = TextRequest::new(RECIPE_SYSTEM_PROMPT, build_recipe_prompt(filters, slot, earlier))
        .temperature(config.recipe_temperature)
        .max_tokens(config.recipe_max_tokens);

    let content = client.generate_text(&request).await?;
    log::debug!("Raw response for recipe {}:\n{}", slot.index, content);
    parse_recipe_response(&content)
}

/// Generate one recipe per slot of the requested meal plan.
///
/// Slots run strictly one after another. Any failing slot aborts the whole
/// request and no partial list is returned.
pub async fn generate_recipes(
    client: &dyn GenerativeClient,
    config: &GenerationConfig,
    filters: &FilterOptions,
) -> Result<Vec<Recipe>, PlannerError> {
    filters.validate()?;

    let slots = plan_slots(filters.meal_plan_type);
    log::info!(
        "Generating {} recipe(s) for meal plan '{}'",
        slots.len(),
        filters.meal_plan_type
    );

    let mut recipes = Vec::with_capacity(slots.len());
    for slot in &slots {
        match generate_slot(client, config, filters, slot, &recipes).await {
            Ok(recipe) => {
                log::info!("Recipe {}/{}: {}", slot.index + 1, slots.len(), recipe.name);
                recipes.push(recipe);
            }
            Err(source) => {
                log::error!("Could not generate recipe {}: {}", slot.index, source);
                return Err(PlannerError::Generation {
                    slot: slot.index,
                    source,
                });
            }
        }
    }
    Ok(recipes)
}
