use anyhow::{anyhow, Context};
use async_trait::async_trait;
use domain::provider::{CompletionProvider, CompletionRequest, EmbeddingProvider};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    num_predict: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
    #[serde(default)]
    done: bool,
}

/// Local Ollama server: embeddings for the knowledge base and, optionally,
/// chat completions in place of the hosted API.
#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        chat_model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_model: chat_model.into(),
            embedding_model: embedding_model.into(),
        }
    }

    pub async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            prompt: text,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("embedding request to {url} failed; is Ollama running?"))?;
        let status = response.status();
        let body = response.text().await?;
        parse_embedding(status, &body, &self.embedding_model)
    }

    pub async fn generate_response(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: ChatOptions {
                num_predict: max_tokens,
            },
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("Ollama API error ({status}): {text}"));
        }
        Ok(collect_chat_content(&text))
    }
}

fn parse_embedding(status: StatusCode, body: &str, model: &str) -> Result<Vec<f32>> {
    if !status.is_success() {
        return Err(anyhow!("Ollama embeddings error ({status}): {}", body.trim()));
    }
    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .with_context(|| format!("unexpected Ollama embeddings response: {}", body.trim()))?;
    if parsed.embedding.is_empty() {
        return Err(anyhow!(
            "Ollama returned an empty embedding; is '{model}' an embedding model?"
        ));
    }
    Ok(parsed.embedding)
}

/// Concatenate message content from a chat body, which may be a single JSON
/// object or newline-delimited stream frames.
fn collect_chat_content(body: &str) -> String {
    let mut full_content = String::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(line) {
            full_content.push_str(&chat_resp.message.content);
            if chat_resp.done {
                break;
            }
        }
    }
    full_content
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    fn model_name(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate_embedding(text).await
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    fn model_name(&self) -> &str {
        &self.chat_model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.generate_response(&request.system, &request.user, request.max_tokens)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_single_and_streamed_bodies() {
        let single = r###"{"message":{"role":"assistant","content":"## Brief"},"done":true}"###;
        assert_eq!(collect_chat_content(single), "## Brief");

        let streamed = concat!(
            r#"{"message":{"role":"assistant","content":"EXECUTIVE "},"done":false}"#,
            "\n",
            r#"{"message":{"role":"assistant","content":"SUMMARY"},"done":true}"#,
            "\n",
            r#"{"message":{"role":"assistant","content":"ignored"},"done":false}"#,
        );
        assert_eq!(collect_chat_content(streamed), "EXECUTIVE SUMMARY");
    }

    #[test]
    fn embedding_errors_name_the_status_and_model() {
        let err = parse_embedding(
            StatusCode::NOT_FOUND,
            r#"{"error":"model \"all-minilm\" not found, try pulling it first"}"#,
            "all-minilm",
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("try pulling it first"));

        let err = parse_embedding(StatusCode::OK, r#"{"embedding":[]}"#, "llama3").unwrap_err();
        assert!(err.to_string().contains("'llama3' an embedding model"));

        assert!(parse_embedding(StatusCode::OK, "<html>", "all-minilm").is_err());
        assert_eq!(
            parse_embedding(StatusCode::OK, r#"{"embedding":[0.5,-1.0]}"#, "all-minilm").unwrap(),
            vec![0.5, -1.0]
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = OllamaClient::new("http://localhost:11434/", "chat", "all-minilm");
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(EmbeddingProvider::model_name(&client), "all-minilm");
        assert_eq!(CompletionProvider::model_name(&client), "chat");
    }
}
