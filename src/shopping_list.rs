use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::category::Category;
use crate::classifier::{classify_or_other, IngredientClassifier};
use crate::ingredients::{merge_ingredients, ParsedIngredient};
use crate::types::Recipe;

/// Merged ingredients grouped by category. All twelve buckets are always
/// present and iterate in `Category::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    categories: BTreeMap<Category, Vec<ParsedIngredient>>,
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self {
            categories: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, ingredient: ParsedIngredient) {
        self.categories.entry(category).or_default().push(ingredient);
    }

    pub fn items(&self, category: Category) -> &[ParsedIngredient] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ParsedIngredient])> {
        self.categories
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    pub fn category_of(&self, item: &str) -> Option<Category> {
        self.iter()
            .find(|(_, items)| items.iter().any(|ingredient| ingredient.item == item))
            .map(|(category, _)| category)
    }

    /// Number of merged ingredients across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text list for sharing through chat or mail.
    pub fn share_text(&self) -> String {
        let lines = self
            .iter()
            .flat_map(|(_, items)| items.iter().map(ToString::to_string))
            .collect::<Vec<_>>();
        format!("Inköpslista:\n\n{}", lines.join("\n"))
    }
}

/// Merge every recipe's ingredients and group them by category.
///
/// The classifier runs once per distinct item, concurrently; results are
/// joined before any grouping happens.
pub async fn build_shopping_list(
    recipes: &[Recipe],
    classifier: &dyn IngredientClassifier,
) -> ShoppingList {
    let merged = merge_ingredients(recipes.iter().flat_map(|recipe| recipe.ingredients.iter()));

    let mut distinct_items: Vec<&str> = Vec::new();
    for ingredient in merged.iter() {
        if !distinct_items.contains(&ingredient.item.as_str()) {
            distinct_items.push(&ingredient.item);
        }
    }
    log::info!(
        "Categorizing {} distinct ingredients from {} recipes",
        distinct_items.len(),
        recipes.len()
    );

    let categories = join_all(
        distinct_items
            .iter()
            .map(|item| classify_or_other(classifier, item)),
    )
    .await;
    let category_by_item: HashMap<String, Category> = distinct_items
        .iter()
        .map(|item| item.to_string())
        .zip(categories)
        .collect();

    let mut list = ShoppingList::new();
    for ingredient in merged.into_vec() {
        let category = category_by_item
            .get(&ingredient.item)
            .copied()
            .unwrap_or(Category::Other);
        list.push(category, ingredient);
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KeywordClassifier;

    fn recipe_with(ingredients: &[&str]) -> Recipe {
        Recipe {
            name: "Test".to_string(),
            cooking_time: "20 min".to_string(),
            difficulty: 1,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: vec![],
            cuisine: "Svenskt".to_string(),
            diets: vec![],
            is_eco_friendly: false,
            occasion: String::new(),
            cooking_method: String::new(),
            image_url: None,
        }
    }

    #[test]
    fn empty_list_has_all_buckets() {
        let list = ShoppingList::new();
        assert_eq!(list.iter().count(), 12);
        assert!(list.is_empty());
        let order: Vec<Category> = list.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[tokio::test]
    async fn merges_across_recipes_before_grouping() {
        let recipes = vec![
            recipe_with(&["2 dl mjölk", "400 g lax"]),
            recipe_with(&["1 dl mjölk", "pasta"]),
        ];
        let list = build_shopping_list(&recipes, &KeywordClassifier).await;

        assert_eq!(list.len(), 3);
        assert_eq!(list.items(Category::Dairy)[0].amount, "3");
        assert_eq!(list.category_of("lax"), Some(Category::Fish));
        assert_eq!(list.category_of("pasta"), Some(Category::DryGoods));
    }

    #[tokio::test]
    async fn share_text_lists_items_in_category_order() {
        let recipes = vec![recipe_with(&["pasta", "2 dl mjölk", "3 ägg"])];
        let list = build_shopping_list(&recipes, &KeywordClassifier).await;
        assert_eq!(list.share_text(), "Inköpslista:\n\n2 dl mjölk\n3 ägg\npasta");
    }

    #[test]
    fn serializes_as_category_map() {
        let mut list = ShoppingList::new();
        list.push(Category::Meat, ParsedIngredient::parse("500 g kycklingfilé"));
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["meat"][0]["item"], "kycklingfilé");
        assert_eq!(value["other"], serde_json::json!([]));
    }
}
