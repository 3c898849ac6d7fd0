use anyhow::anyhow;
use async_trait::async_trait;
use domain::provider::{CompletionProvider, CompletionRequest};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::types::Result;
use shared::utils::truncate_chars;
use std::sync::Arc;
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Client for the hosted Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub async fn create_message(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: vec![RequestMessage {
                role: "user",
                content: &request.user,
            }],
        };
        tracing::debug!(model = %self.model, max_tokens = request.max_tokens, "calling messages API");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        parse_message_text(&text)
    }
}

/// Join every text block of a successful response.
fn parse_message_text(body: &str) -> Result<String> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("unexpected messages API response: {e}"))?;
    if response.stop_reason.as_deref() == Some("max_tokens") {
        tracing::warn!("brief was cut off at the max_tokens limit");
    }
    Ok(response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join(""))
}

fn api_error(status: StatusCode, body: &str) -> anyhow::Error {
    let detail = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => format!("{}: {}", parsed.error.kind, parsed.error.message),
        Err(_) => truncate_chars(body.trim(), 500),
    };
    let hint = match status.as_u16() {
        401 | 403 => " (hint: check ANTHROPIC_API_KEY)",
        429 => " (hint: rate limited, retry shortly)",
        529 => " (hint: API overloaded, retry shortly)",
        _ => "",
    };
    anyhow!("messages API error {status}: {detail}{hint}")
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.create_message(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_blocks_only() {
        let body = r#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "1. EXECUTIVE SUMMARY\n"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": "- Integrate within 90 days"}
            ],
            "stop_reason": "end_turn"
        }"#;
        assert_eq!(
            parse_message_text(body).unwrap(),
            "1. EXECUTIVE SUMMARY\n- Integrate within 90 days"
        );
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        assert!(parse_message_text("not json").is_err());
    }

    #[test]
    fn error_body_is_decoded_with_hint() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let message = api_error(StatusCode::UNAUTHORIZED, body).to_string();
        assert!(message.contains("authentication_error: invalid x-api-key"));
        assert!(message.contains("ANTHROPIC_API_KEY"));

        let message = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").to_string();
        assert!(message.contains("502"));
        assert!(message.contains("<html>bad gateway</html>"));
    }

    #[test]
    fn busy_statuses_suggest_retrying() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let message = api_error(StatusCode::TOO_MANY_REQUESTS, body).to_string();
        assert!(message.contains("rate_limit_error: slow down"));
        assert!(message.contains("rate limited, retry shortly"));

        let overloaded = StatusCode::from_u16(529).unwrap();
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let message = api_error(overloaded, body).to_string();
        assert!(message.contains("529"));
        assert!(message.contains("API overloaded, retry shortly"));
    }

    #[test]
    fn request_serializes_system_separately() {
        let body = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 4000,
            system: "You are a senior consultant.",
            messages: vec![RequestMessage {
                role: "user",
                content: "CLIENT CHALLENGE",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["system"], "You are a senior consultant.");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 4000);
    }
}
