use futures::future::join_all;
use tokio::time::sleep;

use crate::api_connection::GenerativeClient;
use crate::config::BatchConfig;
use crate::errors::ImageError;
use crate::types::Recipe;

pub const BACKGROUND_PROMPT: &str = "Abstract food background with subtle culinary elements, soft pastel colors, very light and airy, perfect for website background, minimalistic design";

pub fn recipe_image_prompt(recipe: &Recipe) -> String {
    format!(
        "A professional food photo of {}, {} cuisine style, on a white plate with garnish, professional lighting, high quality, 4k",
        recipe.name, recipe.cuisine
    )
}

async fn image_with_retry(
    client: &dyn GenerativeClient,
    recipe: &Recipe,
    config: &BatchConfig,
) -> Result<String, ImageError> {
    let prompt = recipe_image_prompt(recipe);
    let attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match client.generate_image(&prompt).await {
            Ok(url) => return Ok(url),
            Err(e) if attempt < attempts => {
                log::warn!(
                    "Image attempt {}/{} for '{}' failed: {}",
                    attempt,
                    attempts,
                    recipe.name,
                    e
                );
                attempt += 1;
                sleep(config.retry_delay).await;
            }
            Err(e) => {
                return Err(ImageError {
                    recipe: recipe.name.clone(),
                    attempts,
                    last_error: e,
                })
            }
        }
    }
}

/// Attach a generated image URL to every recipe.
///
/// Recipes are processed in batches of `config.batch_size`; calls within a
/// batch run concurrently and each result is written back to the recipe at
/// the same position. A recipe whose image cannot be generated keeps
/// `image_url == None`; this never fails the whole operation.
pub async fn attach_images(
    client: &dyn GenerativeClient,
    mut recipes: Vec<Recipe>,
    config: &BatchConfig,
) -> Vec<Recipe> {
    let batch_size = config.batch_size.max(1);
    let batch_count = recipes.len().div_ceil(batch_size);

    for (batch_index, batch) in recipes.chunks_mut(batch_size).enumerate() {
        log::info!(
            "Generating images for batch {}/{} ({} recipes)",
            batch_index + 1,
            batch_count,
            batch.len()
        );

        let results = join_all(
            batch
                .iter()
                .map(|recipe| image_with_retry(client, recipe, config)),
        )
        .await;

        for (recipe, result) in batch.iter_mut().zip(results) {
            recipe.image_url = match result {
                Ok(url) => Some(url),
                Err(e) => {
                    log::error!("{}", e);
                    None
                }
            };
        }

        if batch_index + 1 < batch_count && !config.batch_delay.is_zero() {
            log::info!(
                "Waiting {:?} before the next image batch",
                config.batch_delay
            );
            sleep(config.batch_delay).await;
        }
    }

    recipes
}

/// Decorative page background, used by the HTTP front end.
pub async fn generate_background(client: &dyn GenerativeClient) -> Option<String> {
    match client.generate_image(BACKGROUND_PROMPT).await {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("Could not generate background image: {}", e);
            None
        }
    }
}
