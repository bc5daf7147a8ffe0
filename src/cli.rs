use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::PlannerConfig;
use crate::types::{FilterOptions, MealPlanType, Recipe};

#[derive(Parser, Debug)]
#[command(author, version, about = "AI-generated meal plans with a categorized shopping list", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for values otherwise read from `MENYPLAN_*` environment variables.
#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    /// Environment variable holding the API key
    #[arg(long, global = true)]
    pub api_key_var: Option<String>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub text_model: Option<String>,

    #[arg(long, global = true)]
    pub image_model: Option<String>,

    /// Image size, e.g. 1024x1024
    #[arg(long, global = true)]
    pub image_size: Option<String>,

    #[arg(long, global = true)]
    pub image_quality: Option<String>,

    #[arg(long, global = true)]
    pub recipe_temperature: Option<f32>,

    #[arg(long, global = true)]
    pub recipe_max_tokens: Option<u32>,

    #[arg(long, global = true)]
    pub classification_temperature: Option<f32>,

    #[arg(long, global = true)]
    pub classification_max_tokens: Option<u32>,

    /// Recipes per image batch
    #[arg(long, global = true)]
    pub image_batch_size: Option<usize>,

    /// Attempts per image, including the first
    #[arg(long, global = true)]
    pub image_max_attempts: Option<usize>,

    /// Seconds between attempts for one image
    #[arg(long, global = true)]
    pub image_retry_delay: Option<u64>,

    /// Seconds between image batches
    #[arg(long, global = true)]
    pub image_batch_delay: Option<u64>,

    /// Categorize ingredients with the built-in keyword table instead of the model
    #[arg(long, global = true)]
    pub offline_categories: bool,
}

impl GlobalOptions {
    pub fn apply(&self, config: &mut PlannerConfig) {
        if let Some(var) = &self.api_key_var {
            config.api.api_key_env_var = var.clone();
        }
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(model) = &self.text_model {
            config.api.text_model = model.clone();
        }
        if let Some(model) = &self.image_model {
            config.api.image_model = model.clone();
        }
        if let Some(size) = &self.image_size {
            config.api.image_size = size.clone();
        }
        if let Some(quality) = &self.image_quality {
            config.api.image_quality = Some(quality.clone());
        }
        if let Some(temperature) = self.recipe_temperature {
            config.generation.recipe_temperature = temperature;
        }
        if let Some(tokens) = self.recipe_max_tokens {
            config.generation.recipe_max_tokens = tokens;
        }
        if let Some(temperature) = self.classification_temperature {
            config.generation.classification_temperature = temperature;
        }
        if let Some(tokens) = self.classification_max_tokens {
            config.generation.classification_max_tokens = tokens;
        }
        if let Some(attempts) = self.image_max_attempts {
            config.batch.max_attempts = attempts.max(1);
        }
        if let Some(size) = self.image_batch_size {
            config.batch.batch_size = size.max(1);
        }
        if let Some(secs) = self.image_retry_delay {
            config.batch.retry_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.image_batch_delay {
            config.batch.batch_delay = Duration::from_secs(secs);
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate recipes for a meal plan, then print them with their shopping list
    Generate(GenerateArgs),

    /// Build a shopping list from a JSON file of recipes
    ShoppingList {
        /// File with a recipe array or a `{"recipes": [...]}` object
        #[arg(short, long)]
        recipes_file: PathBuf,

        /// Print the shareable text instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Serve the JSON HTTP API
    Serve {
        #[arg(long, env = "MENYPLAN_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// "En dag", "Helg" or "Vecka med lyxig helgmeny" (or day / weekend / week)
    #[arg(short, long, default_value = "En dag")]
    pub meal_plan: MealPlanType,

    #[arg(long, default_value = "")]
    pub cuisine: String,

    /// Diet constraint, may be repeated
    #[arg(long = "diet")]
    pub diets: Vec<String>,

    #[arg(long)]
    pub eco_friendly: bool,

    #[arg(long, default_value = "")]
    pub occasion: String,

    #[arg(long, default_value = "")]
    pub cooking_method: String,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub difficulty: u8,

    #[arg(long, default_value = "")]
    pub cooking_time: String,

    /// Also write the recipes as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print shareable text instead of JSON
    #[arg(long)]
    pub text: bool,
}

impl GenerateArgs {
    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            cuisine: self.cuisine.clone(),
            diets: self.diets.clone(),
            is_eco_friendly: self.eco_friendly,
            occasion: self.occasion.clone(),
            meal_plan_type: self.meal_plan,
            cooking_method: self.cooking_method.clone(),
            difficulty: self.difficulty,
            cooking_time: self.cooking_time.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipesFile {
    List(Vec<Recipe>),
    Wrapped { recipes: Vec<Recipe> },
}

/// Read recipes saved by `generate --output` or returned by the HTTP API.
pub async fn read_recipes_file(path: &Path) -> Result<Vec<Recipe>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipes file '{}'", path.display()))?;

    let parsed: RecipesFile = serde_json::from_str(&content)
        .with_context(|| format!("'{}' does not contain recipes", path.display()))?;

    Ok(match parsed {
        RecipesFile::List(recipes) => recipes,
        RecipesFile::Wrapped { recipes } => recipes,
    })
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_args_build_filters() {
        let cli = Cli::try_parse_from([
            "menyplan",
            "generate",
            "--meal-plan",
            "Helg",
            "--diet",
            "Veganskt",
            "--diet",
            "Glutenfritt",
            "--eco-friendly",
            "--difficulty",
            "4",
        ])
        .unwrap();

        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let filters = args.filters();
        assert_eq!(filters.meal_plan_type, MealPlanType::Weekend);
        assert_eq!(filters.diets, vec!["Veganskt", "Glutenfritt"]);
        assert!(filters.is_eco_friendly);
        assert_eq!(filters.difficulty, 4);
    }

    #[test]
    fn unknown_meal_plan_is_rejected() {
        assert!(Cli::try_parse_from(["menyplan", "generate", "--meal-plan", "Månad"]).is_err());
    }

    #[test]
    fn difficulty_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["menyplan", "generate", "--difficulty", "6"]).is_err());
    }

    #[test]
    fn global_options_override_config() {
        let cli = Cli::try_parse_from([
            "menyplan",
            "serve",
            "--image-batch-delay",
            "0",
            "--text-model",
            "gpt-4o-mini",
        ])
        .unwrap();

        let mut config = PlannerConfig::default();
        cli.options.apply(&mut config);
        assert!(config.batch.batch_delay.is_zero());
        assert_eq!(config.api.text_model, "gpt-4o-mini");
        assert_eq!(config.batch.batch_size, 5);
    }

    #[test]
    fn every_setting_has_a_flag() {
        let cli = Cli::try_parse_from([
            "menyplan",
            "--api-key-var",
            "MY_KEY",
            "--base-url",
            "http://localhost:8080/v1",
            "--image-model",
            "dall-e-2",
            "--image-size",
            "512x512",
            "--image-quality",
            "hd",
            "--recipe-temperature",
            "0.5",
            "--recipe-max-tokens",
            "800",
            "--classification-temperature",
            "0.1",
            "--classification-max-tokens",
            "12",
            "--image-max-attempts",
            "0",
            "--image-batch-size",
            "2",
            "--image-retry-delay",
            "1",
            "shopping-list",
            "--recipes-file",
            "recept.json",
        ])
        .unwrap();

        let mut config = PlannerConfig::default();
        cli.options.apply(&mut config);
        assert_eq!(config.api.api_key_env_var, "MY_KEY");
        assert_eq!(config.api.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api.image_model, "dall-e-2");
        assert_eq!(config.api.image_size, "512x512");
        assert_eq!(config.api.image_quality.as_deref(), Some("hd"));
        assert_eq!(config.generation.recipe_temperature, 0.5);
        assert_eq!(config.generation.recipe_max_tokens, 800);
        assert_eq!(config.generation.classification_temperature, 0.1);
        assert_eq!(config.generation.classification_max_tokens, 12);
        assert_eq!(config.batch.max_attempts, 1);
        assert_eq!(config.batch.batch_size, 2);
        assert_eq!(config.batch.retry_delay, Duration::from_secs(1));
    }
}
