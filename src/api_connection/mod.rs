//! Boundary to the remote generative text/image API.
//!
//! Everything in the crate talks to the remote service through the
//! [`GenerativeClient`] trait so tests can substitute [`FakeClient`].

pub mod connection;
pub mod endpoints;
mod fake;

pub use connection::{ApiConnectionError, OpenAiClient};
pub use endpoints::TextRequest;
pub use fake::FakeClient;

use async_trait::async_trait;
use std::fmt;

/// A remote generative model: prompt in, text or image URL out.
#[async_trait]
pub trait GenerativeClient: Send + Sync + fmt::Debug {
    /// Run a chat completion and return the first choice's content.
    async fn generate_text(&self, request: &TextRequest) -> Result<String, ApiConnectionError>;

    /// Generate one image and return its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, ApiConnectionError>;
}
