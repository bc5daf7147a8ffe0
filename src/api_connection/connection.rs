use async_trait::async_trait;
use reqwest::Client;
use std::env;
use thiserror::Error;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse, TextRequest,
};
use super::GenerativeClient;
use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },

    #[error("API returned no usable content: {0}")]
    EmptyResponse(String),
}

/// OpenAI-compatible chat completion and image generation client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ApiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<String, ApiConnectionError> {
        env::var(&self.config.api_key_env_var)
            .map_err(|_| ApiConnectionError::MissingApiKey(self.config.api_key_env_var.clone()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<Req, Resp>(&self, path: &str, payload: &Req) -> Result<Resp, ApiConnectionError>
    where
        Req: serde::Serialize + ?Sized,
        Resp: serde::de::DeserializeOwned,
    {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        if response.status().is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::ApiError { status, error_body })
        }
    }
}

#[async_trait]
impl GenerativeClient for OpenAiClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String, ApiConnectionError> {
        let payload = ChatCompletionRequest::from_text_request(&self.config.text_model, request);
        log::debug!(
            "chat completion: model={} temperature={} max_tokens={}",
            payload.model,
            request.temperature,
            request.max_tokens
        );

        let response: ChatCompletionResponse = self.post_json("chat/completions", &payload).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ApiConnectionError::EmptyResponse("no content in response choices".to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ApiConnectionError> {
        let payload = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.image_size.clone(),
            quality: self.config.image_quality.clone(),
        };
        log::debug!("image generation: model={} size={}", payload.model, payload.size);

        let response: ImageGenerationResponse =
            self.post_json("images/generations", &payload).await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| ApiConnectionError::EmptyResponse("no image URL returned".to_string()))
    }
}
