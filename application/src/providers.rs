use domain::provider::{CompletionProvider, EmbeddingProvider};
use infrastructure::anthropic_client::AnthropicClient;
use infrastructure::config::{Config, LlmProvider};
use infrastructure::ollama_client::OllamaClient;
use shared::types::Result;
use std::sync::Arc;

fn ollama(config: &Config) -> OllamaClient {
    OllamaClient::new(
        &config.ollama_base_url,
        &config.ollama_model,
        &config.embedding_model,
    )
}

pub fn embedding_provider(config: &Config) -> Arc<dyn EmbeddingProvider> {
    Arc::new(ollama(config))
}

/// The generator selected by `LLM_PROVIDER`. The hosted provider needs an
/// API key, so this fails early when one is missing.
pub fn completion_provider(config: &Config) -> Result<Arc<dyn CompletionProvider>> {
    match config.llm_provider {
        LlmProvider::Anthropic => {
            let client = AnthropicClient::new(
                &config.anthropic_base_url,
                config.require_api_key()?,
                &config.anthropic_model,
            )?;
            Ok(Arc::new(client))
        }
        LlmProvider::Ollama => Ok(Arc::new(ollama(config))),
    }
}

/// Model name used in cache keys, resolved without building a client.
pub fn completion_model_name(config: &Config) -> &str {
    match config.llm_provider {
        LlmProvider::Anthropic => &config.anthropic_model,
        LlmProvider::Ollama => &config.ollama_model,
    }
}
