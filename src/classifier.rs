//! Ingredient → category classification.
//!
//! Classification is best effort: [`classify_or_other`] turns every failure
//! into [`Category::Other`] so a shopping list can always be built.

use async_trait::async_trait;
use std::sync::Arc;

use crate::api_connection::{GenerativeClient, TextRequest};
use crate::category::Category;
use crate::config::GenerationConfig;
use crate::errors::ClassificationError;

#[async_trait]
pub trait IngredientClassifier: Send + Sync {
    async fn classify(&self, item: &str) -> Result<Category, ClassificationError>;
}

/// Classify `item`, falling back to `Other` on any failure.
pub async fn classify_or_other(classifier: &dyn IngredientClassifier, item: &str) -> Category {
    match classifier.classify(item).await {
        Ok(category) => category,
        Err(e) => {
            log::warn!("Could not categorize '{}', using {}: {}", item, Category::Other, e);
            Category::Other
        }
    }
}

fn classification_system_prompt() -> String {
    let labels = Category::ALL
        .iter()
        .map(|category| format!("- {}", category.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Du är en expert på att kategorisera matvaror. Kategorisera ingredienser i exakt en av följande kategorier:\n{}\n\nSvara endast med kategorin i lowercase, inga andra ord eller förklaringar.",
        labels
    )
}

/// Asks the text model for one of the twelve category labels.
#[derive(Debug, Clone)]
pub struct LlmClassifier {
    client: Arc<dyn GenerativeClient>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmClassifier {
    pub fn new(client: Arc<dyn GenerativeClient>, config: &GenerationConfig) -> Self {
        Self {
            client,
            temperature: config.classification_temperature,
            max_tokens: config.classification_max_tokens,
        }
    }
}

#[async_trait]
impl IngredientClassifier for LlmClassifier {
    async fn classify(&self, item: &str) -> Result<Category, ClassificationError> {
        let request = TextRequest::new(classification_system_prompt(), item)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);

        let answer = self.client.generate_text(&request).await?;
        log::debug!("'{}' categorized as '{}'", item, answer.trim());
        answer.parse()
    }
}

/// Offline classifier over the static keyword hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

#[async_trait]
impl IngredientClassifier for KeywordClassifier {
    async fn classify(&self, item: &str) -> Result<Category, ClassificationError> {
        Category::from_keywords(item)
            .ok_or_else(|| ClassificationError::UnknownLabel(item.to_string()))
    }
}
