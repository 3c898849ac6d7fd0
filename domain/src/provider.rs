//! Seams to the external services: embeddings and chat completion.

use async_trait::async_trait;
use shared::types::Result;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier recorded next to stored vectors; a change invalidates them.
    fn model_name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
