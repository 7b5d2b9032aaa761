//! OpenAI-compatible chat-completion wire format shared by all providers.

use super::GatewayError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Session tag; the gateway keys conversation state on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    /// Single-turn request carrying one user message.
    pub fn single_turn(model: impl Into<String>, prompt: &str, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            user: Some(user.into()),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat completion response (non-streaming).
///
/// Everything except `choices` is optional so that minimal gateways parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

impl ChatCompletionResponse {
    /// Text of the first choice.
    ///
    /// A missing `choices` array, a choice without a message, non-string or
    /// blank content are all protocol failures, never an empty success.
    pub fn into_content(self) -> Result<String, GatewayError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            GatewayError::InvalidResponse("Response contained no choices".to_string())
        })?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("First choice has no message content".to_string())
            })?;

        match content {
            serde_json::Value::String(text) if !text.trim().is_empty() => Ok(text),
            serde_json::Value::String(_) => Err(GatewayError::InvalidResponse(
                "First choice has empty content".to_string(),
            )),
            other => Err(GatewayError::InvalidResponse(format!(
                "Expected string content, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// POST one chat completion and return the first choice's text.
pub(crate) async fn post_chat_completion(
    client: &Client,
    base_url: &str,
    token: &str,
    request: &ChatCompletionRequest,
    deadline: Duration,
) -> Result<String, GatewayError> {
    let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

    let response = client
        .post(&url)
        .header("authorization", format!("Bearer {}", token))
        .json(request)
        .timeout(deadline)
        .send()
        .await
        .map_err(|e| GatewayError::from_reqwest(e, deadline))?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(GatewayError::Upstream {
            status: status.as_u16(),
            message: error_body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::from_reqwest(e, deadline))?;

    let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
        GatewayError::InvalidResponse(format!("Failed to parse completion response: {}", e))
    })?;

    completion.into_content()
}
