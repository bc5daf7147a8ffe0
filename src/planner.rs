use std::fmt;
use std::sync::Arc;

use crate::api_connection::{GenerativeClient, OpenAiClient};
use crate::category::Category;
use crate::classifier::{classify_or_other, IngredientClassifier, KeywordClassifier, LlmClassifier};
use crate::config::PlannerConfig;
use crate::errors::PlannerError;
use crate::image_batcher::{attach_images, generate_background};
use crate::recipe_generator::generate_recipes;
use crate::shopping_list::{build_shopping_list, ShoppingList};
use crate::types::{FilterOptions, Recipe};

/// The operations offered to the presentation layer (CLI and HTTP API).
#[derive(Clone)]
pub struct MealPlanner {
    client: Arc<dyn GenerativeClient>,
    classifier: Arc<dyn IngredientClassifier>,
    config: PlannerConfig,
}

impl fmt::Debug for MealPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MealPlanner")
            .field("client", &self.client)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MealPlanner {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        classifier: Arc<dyn IngredientClassifier>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            client,
            classifier,
            config,
        }
    }

    /// Planner backed by the OpenAI API, classifying ingredients remotely or,
    /// with `offline_categories`, by keyword.
    pub fn from_config(config: PlannerConfig, offline_categories: bool) -> Self {
        let client: Arc<dyn GenerativeClient> = Arc::new(OpenAiClient::new(config.api.clone()));
        let classifier: Arc<dyn IngredientClassifier> = if offline_categories {
            Arc::new(KeywordClassifier)
        } else {
            Arc::new(LlmClassifier::new(client.clone(), &config.generation))
        };
        Self::new(client, classifier, config)
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate the recipes for a meal plan and attach their images.
    pub async fn submit_filters(&self, filters: &FilterOptions) -> Result<Vec<Recipe>, PlannerError> {
        let recipes =
            generate_recipes(self.client.as_ref(), &self.config.generation, filters).await?;
        Ok(attach_images(self.client.as_ref(), recipes, &self.config.batch).await)
    }

    pub async fn build_shopping_list(&self, recipes: &[Recipe]) -> ShoppingList {
        build_shopping_list(recipes, self.classifier.as_ref()).await
    }

    pub async fn categorize(&self, item: &str) -> Category {
        classify_or_other(self.classifier.as_ref(), item).await
    }

    pub async fn background_image(&self) -> Option<String> {
        generate_background(self.client.as_ref()).await
    }
}
