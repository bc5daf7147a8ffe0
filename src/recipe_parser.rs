//! Turns a model's free-text answer into a validated [`Recipe`].

use serde_json::{Map, Value};

use crate::errors::GenerationError;
use crate::types::{Recipe, DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY};

pub const REQUIRED_FIELDS: [&str; 6] = [
    "name",
    "cookingTime",
    "difficulty",
    "ingredients",
    "instructions",
    "cuisine",
];

const OPTIONAL_FIELDS: [&str; 4] = ["diets", "isEcoFriendly", "occasion", "cookingMethod"];

/// Return the first balanced `{...}` block in `text`. Braces inside JSON
/// string literals are ignored.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Difficulty as a number in 1..=5. Values that are not numbers fall back to
/// the default rather than failing the recipe.
fn coerce_difficulty(value: &Value) -> u8 {
    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match numeric {
        Some(n) if n.is_finite() => {
            n.round().clamp(MIN_DIFFICULTY as f64, MAX_DIFFICULTY as f64) as u8
        }
        _ => {
            log::warn!(
                "Non-numeric difficulty {}, using {}",
                value,
                DEFAULT_DIFFICULTY
            );
            DEFAULT_DIFFICULTY
        }
    }
}

fn normalize_fields(object: &mut Map<String, Value>) {
    let difficulty = coerce_difficulty(object.get("difficulty").unwrap_or(&Value::Null));
    object.insert("difficulty".to_string(), Value::from(difficulty));

    if let Some(Value::Number(minutes)) = object.get("cookingTime") {
        let as_text = format!("{} min", minutes);
        object.insert("cookingTime".to_string(), Value::String(as_text));
    }

    // Optional fields the model left null fall back to their defaults.
    for field in OPTIONAL_FIELDS {
        if object.get(field).is_some_and(Value::is_null) {
            object.remove(field);
        }
    }
    // The image is attached by the image batcher, never by the model.
    object.remove("imageUrl");
}

/// Parse a raw model response into a `Recipe`.
pub fn parse_recipe_response(content: &str) -> Result<Recipe, GenerationError> {
    let block = extract_json_block(content).ok_or(GenerationError::NoJson)?;
    let value: Value = serde_json::from_str(block)?;

    let Value::Object(mut object) = value else {
        return Err(GenerationError::NoJson);
    };

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(GenerationError::MissingField(field));
        }
    }

    normalize_fields(&mut object);
    Ok(serde_json::from_value(Value::Object(object))?)
}
