use dotenv::dotenv;
use menyplan::api_connection::{ApiConnectionError, GenerativeClient, OpenAiClient, TextRequest};
use menyplan::config::ApiConfig;
use std::env;

const TEST_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

fn setup_test_environment() {
    dotenv().ok();
}

fn live_client() -> Option<OpenAiClient> {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!("Skipping live test: {} not set.", TEST_API_KEY_ENV_VAR);
        return None;
    }
    Some(OpenAiClient::new(ApiConfig {
        api_key_env_var: TEST_API_KEY_ENV_VAR.to_string(),
        ..ApiConfig::default()
    }))
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let client = OpenAiClient::new(ApiConfig {
        api_key_env_var: "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ".to_string(),
        ..ApiConfig::default()
    });

    let result = client.generate_image("A bowl of soup").await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
#[ignore]
async fn test_successful_text_call() {
    let Some(client) = live_client() else {
        return;
    };

    let request = TextRequest::new("Svara kortfattat.", "Vad heter Sveriges huvudstad?")
        .temperature(0.0)
        .max_tokens(20);
    let text = client.generate_text(&request).await.unwrap();
    println!("Response: {}", text);
    assert!(text.to_lowercase().contains("stockholm"));
}

#[tokio::test]
#[ignore]
async fn test_successful_image_call() {
    let Some(client) = live_client() else {
        return;
    };

    let url = client
        .generate_image("A professional food photo of Swedish meatballs")
        .await
        .unwrap();
    println!("Image URL: {}", url);
    assert!(url.starts_with("http"));
}
