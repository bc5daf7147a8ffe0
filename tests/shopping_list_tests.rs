use async_trait::async_trait;
use menyplan::api_connection::FakeClient;
use menyplan::classifier::{IngredientClassifier, KeywordClassifier, LlmClassifier};
use menyplan::config::GenerationConfig;
use menyplan::errors::ClassificationError;
use menyplan::shopping_list::build_shopping_list;
use menyplan::{Category, Recipe};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn recipe_with(name: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        name: name.to_string(),
        cooking_time: "30 min".to_string(),
        difficulty: 2,
        ingredients: ingredients.iter().map(|line| line.to_string()).collect(),
        instructions: vec!["Laga".to_string()],
        cuisine: "Svenskt".to_string(),
        diets: vec![],
        is_eco_friendly: false,
        occasion: String::new(),
        cooking_method: String::new(),
        image_url: None,
    }
}

/// Classifier over a fixed table. Unknown items fail, optionally after a delay.
#[derive(Default)]
struct TableClassifier {
    table: HashMap<&'static str, Category>,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl TableClassifier {
    fn new(entries: &[(&'static str, Category)]) -> Self {
        Self {
            table: entries.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn with_delay(mut self, item: &'static str, delay: Duration) -> Self {
        self.delays.insert(item, delay);
        self
    }

    fn calls_for(&self, item: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == item)
            .count()
    }
}

#[async_trait]
impl IngredientClassifier for TableClassifier {
    async fn classify(&self, item: &str) -> Result<Category, ClassificationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(item.to_string());
        if let Some(delay) = self.delays.get(item) {
            tokio::time::sleep(*delay).await;
        }
        self.table
            .get(item)
            .copied()
            .ok_or_else(|| ClassificationError::UnknownLabel(item.to_string()))
    }
}

fn basic_table() -> TableClassifier {
    TableClassifier::new(&[
        ("kyckling", Category::Meat),
        ("lax", Category::Fish),
        ("mjölk", Category::Dairy),
    ])
}

#[tokio::test]
async fn test_failed_classification_lands_in_other() {
    let recipes = vec![recipe_with(
        "Middag",
        &["kyckling", "lax", "mjölk", "okänd_vara_xyz"],
    )];
    let classifier = basic_table();

    let list = build_shopping_list(&recipes, &classifier).await;

    assert_eq!(list.len(), 4);
    assert_eq!(list.category_of("kyckling"), Some(Category::Meat));
    assert_eq!(list.category_of("lax"), Some(Category::Fish));
    assert_eq!(list.category_of("mjölk"), Some(Category::Dairy));
    assert_eq!(list.category_of("okänd_vara_xyz"), Some(Category::Other));

    let populated: Vec<Category> = list
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(category, _)| category)
        .collect();
    assert_eq!(
        populated,
        vec![Category::Meat, Category::Fish, Category::Dairy, Category::Other]
    );
}

#[tokio::test]
async fn test_all_categories_present_even_when_empty() {
    let list = build_shopping_list(&[], &basic_table()).await;
    assert!(list.is_empty());
    assert_eq!(list.iter().count(), 12);

    let json = serde_json::to_value(&list).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 12);
    assert!(object.contains_key("dry-goods"));
    assert_eq!(object["meat"], serde_json::json!([]));
}

#[tokio::test]
async fn test_merges_across_recipes_before_grouping() {
    let recipes = vec![
        recipe_with("Gröt", &["2 dl mjölk", "1 nypa salt"]),
        recipe_with("Pannkakor", &["3 dl mjölk", "1 l mjölk"]),
    ];
    let classifier = basic_table();

    let list = build_shopping_list(&recipes, &classifier).await;

    let dairy: Vec<String> = list
        .items(Category::Dairy)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(dairy, vec!["5 dl mjölk", "1 l mjölk"]);
    assert_eq!(list.items(Category::Other).len(), 1);
    assert_eq!(list.items(Category::Other)[0].item, "salt");
}

#[tokio::test]
async fn test_classifier_called_once_per_distinct_item() {
    let recipes = vec![
        recipe_with("A", &["2 dl mjölk", "kyckling"]),
        recipe_with("B", &["1 l mjölk", "kyckling", "mjölk"]),
    ];
    let classifier = basic_table();

    let list = build_shopping_list(&recipes, &classifier).await;

    assert_eq!(classifier.calls_for("mjölk"), 1);
    assert_eq!(classifier.calls_for("kyckling"), 1);
    assert_eq!(classifier.call_count.load(Ordering::SeqCst), 2);
    assert_eq!(list.items(Category::Dairy).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_result_independent_of_completion_order() {
    let recipes = vec![recipe_with(
        "Middag",
        &["kyckling", "lax", "mjölk", "okänd_vara_xyz"],
    )];

    let fast_first = basic_table();
    let slow_first = basic_table()
        .with_delay("kyckling", Duration::from_millis(900))
        .with_delay("lax", Duration::from_millis(300))
        .with_delay("okänd_vara_xyz", Duration::from_millis(600));

    let expected = build_shopping_list(&recipes, &fast_first).await;
    let actual = build_shopping_list(&recipes, &slow_first).await;

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_remote_classifier_failure_falls_back_to_other() {
    let client = Arc::new(FakeClient::new());
    let classifier = LlmClassifier::new(client.clone(), &GenerationConfig::default());
    let recipes = vec![recipe_with("Middag", &["kyckling", "2 dl mjölk"])];

    let list = build_shopping_list(&recipes, &classifier).await;

    assert_eq!(list.items(Category::Other).len(), 2);
    assert_eq!(client.text_calls(), 2);
}

#[tokio::test]
async fn test_remote_labels_are_mapped() {
    let client = Arc::new(
        FakeClient::new()
            .with_text("kyckling", "kött")
            .with_text("mjölk", "Mejeri."),
    );
    let classifier = LlmClassifier::new(client, &GenerationConfig::default());
    let recipes = vec![recipe_with("Middag", &["500 g kyckling", "2 dl mjölk"])];

    let list = build_shopping_list(&recipes, &classifier).await;

    assert_eq!(list.category_of("kyckling"), Some(Category::Meat));
    assert_eq!(list.category_of("mjölk"), Some(Category::Dairy));
}

#[tokio::test]
async fn test_keyword_classifier_share_text() {
    let recipes = vec![recipe_with("Middag", &["500 g kycklingfilé", "2 dl grädde"])];

    let list = build_shopping_list(&recipes, &KeywordClassifier).await;

    assert_eq!(list.category_of("kycklingfilé"), Some(Category::Meat));
    assert_eq!(list.category_of("grädde"), Some(Category::Dairy));
    assert_eq!(
        list.share_text(),
        "Inköpslista:\n\n500 g kycklingfilé\n2 dl grädde"
    );
}
