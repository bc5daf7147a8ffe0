use thiserror::Error;

use crate::api_connection::ApiConnectionError;

/// Fatal errors surfaced by the meal-planning boundary operations.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Could not generate recipe {slot}: {source}")]
    Generation {
        slot: usize,
        #[source]
        source: GenerationError,
    },
}

/// Why a single recipe slot could not be turned into a `Recipe`.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation failed: {0}")]
    Remote(#[from] ApiConnectionError),

    #[error("no JSON object found in model response")]
    NoJson,

    #[error("model response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing field in recipe data: {0}")]
    MissingField(&'static str),
}

/// Image retrieval failed after all attempts. Never escalates past the batcher.
#[derive(Debug, Error)]
#[error("no image for '{recipe}' after {attempts} attempts: {last_error}")]
pub struct ImageError {
    pub recipe: String,
    pub attempts: usize,
    pub last_error: ApiConnectionError,
}

/// Classification failed; callers fall back to `Category::Other`.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classification request failed: {0}")]
    Remote(#[from] ApiConnectionError),

    #[error("unrecognized category label: '{0}'")]
    UnknownLabel(String),
}
