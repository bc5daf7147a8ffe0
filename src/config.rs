//! Runtime configuration, read from the environment (a `.env` file is loaded
//! first by the binary) and overridable from the command line.

use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Name of the environment variable holding the API key, read at call time.
    pub api_key_env_var: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            image_quality: Some("standard".to_string()),
        }
    }
}

/// Sampling parameters for the two kinds of text calls.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub recipe_temperature: f32,
    pub recipe_max_tokens: u32,
    pub classification_temperature: f32,
    pub classification_max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            recipe_temperature: 0.9,
            recipe_max_tokens: 1000,
            classification_temperature: 0.0,
            classification_max_tokens: 10,
        }
    }
}

/// Image batching parameters. The delays track the remote provider's rate
/// limit, so they are tunable rather than fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub batch_size: usize,
    /// Total attempts per image, including the first.
    pub max_attempts: usize,
    pub retry_delay: Duration,
    pub batch_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            batch_delay: Duration::from_secs(61),
        }
    }
}

impl BatchConfig {
    /// No waiting between attempts or batches.
    pub fn without_delays(mut self) -> Self {
        self.retry_delay = Duration::ZERO;
        self.batch_delay = Duration::ZERO;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerConfig {
    pub api: ApiConfig,
    pub generation: GenerationConfig,
    pub batch: BatchConfig,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable value for {}: '{}'", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl PlannerConfig {
    /// Build a configuration from `MENYPLAN_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api = ApiConfig {
            api_key_env_var: env_or("MENYPLAN_API_KEY_VAR", defaults.api.api_key_env_var),
            base_url: env_or("MENYPLAN_BASE_URL", defaults.api.base_url),
            text_model: env_or("MENYPLAN_TEXT_MODEL", defaults.api.text_model),
            image_model: env_or("MENYPLAN_IMAGE_MODEL", defaults.api.image_model),
            image_size: env_or("MENYPLAN_IMAGE_SIZE", defaults.api.image_size),
            image_quality: env::var("MENYPLAN_IMAGE_QUALITY")
                .ok()
                .or(defaults.api.image_quality),
        };

        let generation = GenerationConfig {
            recipe_temperature: env_or(
                "MENYPLAN_RECIPE_TEMPERATURE",
                defaults.generation.recipe_temperature,
            ),
            recipe_max_tokens: env_or(
                "MENYPLAN_RECIPE_MAX_TOKENS",
                defaults.generation.recipe_max_tokens,
            ),
            classification_temperature: env_or(
                "MENYPLAN_CLASSIFICATION_TEMPERATURE",
                defaults.generation.classification_temperature,
            ),
            classification_max_tokens: env_or(
                "MENYPLAN_CLASSIFICATION_MAX_TOKENS",
                defaults.generation.classification_max_tokens,
            ),
        };

        let batch = BatchConfig {
            batch_size: env_or("MENYPLAN_IMAGE_BATCH_SIZE", defaults.batch.batch_size).max(1),
            max_attempts: env_or("MENYPLAN_IMAGE_MAX_ATTEMPTS", defaults.batch.max_attempts).max(1),
            retry_delay: Duration::from_secs(env_or(
                "MENYPLAN_IMAGE_RETRY_DELAY_SECS",
                defaults.batch.retry_delay.as_secs(),
            )),
            batch_delay: Duration::from_secs(env_or(
                "MENYPLAN_IMAGE_BATCH_DELAY_SECS",
                defaults.batch.batch_delay.as_secs(),
            )),
        };

        Self {
            api,
            generation,
            batch,
        }
    }
}
