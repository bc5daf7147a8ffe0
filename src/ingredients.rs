//! Ingredient line parsing and merging for the shopping list.
//!
//! Parsing is a best-effort heuristic over free-form lines such as
//! `"2 dl mjölk"` or `"1 burk krossade tomater"`; it never fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Optional leading quantity, optional alphabetic unit, then the item.
static INGREDIENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(\d+(?:[,.]\d+)?)\s*([a-zåäö]+)?\s+)?(.+)$")
        .expect("Invalid ingredient regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Numeric text as written (`"2"`, `"1,5"`), or empty.
    pub amount: String,
    /// Short unit token (`"dl"`, `"burk"`), or empty.
    pub unit: String,
    /// Lower-cased item description.
    pub item: String,
}

impl ParsedIngredient {
    /// Parse one ingredient line. Lines without a leading quantity become the item.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        match INGREDIENT_REGEX.captures(line) {
            Some(caps) => ParsedIngredient {
                amount: caps.get(1).map_or("", |m| m.as_str()).to_string(),
                unit: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                item: caps
                    .get(3)
                    .map_or(line, |m| m.as_str())
                    .trim()
                    .to_lowercase(),
            },
            None => ParsedIngredient {
                amount: String::new(),
                unit: String::new(),
                item: line.to_lowercase(),
            },
        }
    }

    pub fn key(&self) -> IngredientKey {
        IngredientKey {
            item: self.item.clone(),
            unit: self.unit.clone(),
        }
    }

    /// Amount as a number; empty or unparsable amounts count as zero.
    pub fn numeric_amount(&self) -> f64 {
        parse_amount(&self.amount).unwrap_or(0.0)
    }

    fn absorb(&mut self, other: &ParsedIngredient) {
        self.amount = (self.numeric_amount() + other.numeric_amount()).to_string();
    }
}

// A zero amount (an amountless line merged with itself) is not printed.
impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let no_amount = self.amount.is_empty() || self.numeric_amount() == 0.0;
        match (no_amount, self.unit.is_empty()) {
            (false, false) => write!(f, "{} {} {}", self.amount, self.unit, self.item),
            (false, true) => write!(f, "{} {}", self.amount, self.item),
            _ => f.write_str(&self.item),
        }
    }
}

/// Two ingredients merge iff item and unit are equal (an empty unit is a unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngredientKey {
    pub item: String,
    pub unit: String,
}

fn parse_amount(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}


/// Ingredients merged by `(item, unit)`, iterated in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedIngredients {
    entries: Vec<ParsedIngredient>,
    index: HashMap<IngredientKey, usize>,
}

impl MergedIngredients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, line: &str) {
        self.add(ParsedIngredient::parse(line));
    }

    pub fn add(&mut self, parsed: ParsedIngredient) {
        let key = parsed.key();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].absorb(&parsed),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(parsed);
            }
        }
    }

    pub fn get(&self, item: &str, unit: &str) -> Option<&ParsedIngredient> {
        let key = IngredientKey {
            item: item.to_string(),
            unit: unit.to_string(),
        };
        self.index.get(&key).map(|&position| &self.entries[position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedIngredient> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<ParsedIngredient> {
        self.entries
    }
}

impl<S: AsRef<str>> FromIterator<S> for MergedIngredients {
    fn from_iter<I: IntoIterator<Item = S>>(lines: I) -> Self {
        let mut merged = MergedIngredients::new();
        for line in lines {
            merged.add_line(line.as_ref());
        }
        merged
    }
}

/// Parse and merge ingredient lines.
pub fn merge_ingredients<I, S>(lines: I) -> MergedIngredients
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().collect()
}
