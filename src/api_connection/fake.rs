//! Fake generative client for testing.
//!
//! Responses are matched by checking whether the prompt contains a registered
//! substring, so tests run without network access or API costs.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ApiConnectionError, GenerativeClient, TextRequest};

#[derive(Debug, Default)]
pub struct FakeClient {
    /// (prompt substring, response), tried in registration order
    text_responses: Vec<(String, String)>,
    default_text: Option<String>,
    /// (prompt substring, image URL), tried in registration order
    image_responses: Vec<(String, String)>,
    /// (prompt substring, remaining failures before the image call succeeds)
    image_failures: Mutex<Vec<(String, usize)>>,
    fail_all_images: bool,
    text_prompts: Mutex<Vec<String>>,
    image_prompts: Mutex<Vec<String>>,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

fn simulated_failure(message: String) -> ApiConnectionError {
    ApiConnectionError::ApiError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        error_body: message,
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer text prompts containing `prompt_contains` with `response`.
    pub fn with_text(mut self, prompt_contains: &str, response: &str) -> Self {
        self.text_responses
            .push((prompt_contains.to_string(), response.to_string()));
        self
    }

    pub fn with_default_text(mut self, response: &str) -> Self {
        self.default_text = Some(response.to_string());
        self
    }

    /// Answer image prompts containing `prompt_contains` with `url`.
    pub fn with_image(mut self, prompt_contains: &str, url: &str) -> Self {
        self.image_responses
            .push((prompt_contains.to_string(), url.to_string()));
        self
    }

    /// Fail the first `times` image calls whose prompt contains `prompt_contains`.
    pub fn failing_image(self, prompt_contains: &str, times: usize) -> Self {
        if let Ok(mut failures) = self.image_failures.lock() {
            failures.push((prompt_contains.to_string(), times));
        }
        self
    }

    pub fn failing_all_images(mut self) -> Self {
        self.fail_all_images = true;
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn text_prompts(&self) -> Vec<String> {
        self.text_prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn take_image_failure(&self, prompt: &str) -> bool {
        let Ok(mut failures) = self.image_failures.lock() else {
            return false;
        };
        for (pattern, remaining) in failures.iter_mut() {
            if prompt.contains(pattern.as_str()) && *remaining > 0 {
                *remaining -= 1;
                return true;
            }
        }
        false
    }
}

#[async_trait]
impl GenerativeClient for FakeClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String, ApiConnectionError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.text_prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        let found = self
            .text_responses
            .iter()
            .find(|(pattern, _)| request.prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        found.or_else(|| self.default_text.clone()).ok_or_else(|| {
            simulated_failure(format!(
                "FakeClient: no text response for prompt: {}",
                request.prompt.chars().take(100).collect::<String>()
            ))
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ApiConnectionError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.image_prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if self.fail_all_images || self.take_image_failure(prompt) {
            return Err(simulated_failure("FakeClient: simulated image failure".to_string()));
        }

        self.image_responses
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, url)| url.clone())
            .ok_or_else(|| ApiConnectionError::EmptyResponse("FakeClient: no image URL".to_string()))
    }
}
