pub mod api_connection;
pub mod category;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod errors;
pub mod image_batcher;
pub mod ingredients;
pub mod planner;
pub mod recipe_generator;
pub mod recipe_parser;
pub mod server;
pub mod shopping_list;
pub mod types;

pub use category::Category;
pub use errors::PlannerError;
pub use ingredients::{merge_ingredients, ParsedIngredient};
pub use planner::MealPlanner;
pub use shopping_list::ShoppingList;
pub use types::{FilterOptions, MealPlanType, Recipe};
