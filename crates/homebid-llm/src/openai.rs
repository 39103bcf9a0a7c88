//! OpenAI-compatible provider
//!
//! Talks to any backend exposing the OpenAI chat-completions API shape
//! (OpenAI itself, or local gateways that speak the same protocol).
//!
//! Both call shapes the drafting system needs go through here: single-shot
//! completion for document rewrites, and tool-augmented chat steps for the
//! conversational agent. Exactly one HTTP attempt per call; the caller
//! surfaces failures to the user instead of retrying.

use crate::chat::{ChatMessage, ChatRole, ModelStep, ToolCallRequest, ToolSpec};
use crate::{ChatModel, LlmError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default timeout for backend requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI-compatible chat-completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct CompletionsRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    stream: bool,
}

/// One message on the wire
#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Tool call on the wire
#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

/// Tool specification on the wire
#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionSpec,
}

#[derive(Serialize)]
struct WireFunctionSpec {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct CompletionsResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., `https://api.openai.com`)
    /// - `model`: model identifier (e.g., `gpt-4-turbo`)
    /// - `api_key`: bearer token for the backend
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider against the default endpoint
    pub fn default_endpoint(
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model, api_key)
    }

    /// Issue one chat-completions request and return the first choice
    async fn request(&self, body: &CompletionsRequest) -> Result<WireMessage, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: CompletionsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
        ChatRole::Tool => "tool",
    }
}

fn to_wire(message: &ChatMessage) -> WireMessage {
    let tool_calls = if message.tool_calls.is_empty() {
        None
    } else {
        Some(
            message
                .tool_calls
                .iter()
                .map(|c| WireToolCall {
                    id: c.id.clone(),
                    kind: "function".to_string(),
                    function: WireFunctionCall {
                        name: c.name.clone(),
                        arguments: c.arguments.clone(),
                    },
                })
                .collect(),
        )
    };

    WireMessage {
        role: role_str(message.role).to_string(),
        content: message.content.clone(),
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn to_wire_tool(spec: &ToolSpec) -> WireTool {
    WireTool {
        kind: "function".to_string(),
        function: WireFunctionSpec {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: spec.parameters.clone(),
        },
    }
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!("Completion request, prompt length {} chars", prompt.len());

        let body = CompletionsRequest {
            model: self.model.clone(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
                tool_calls: None,
                tool_call_id: None,
            }],
            tools: None,
            stream: false,
        };

        let message = self.request(&body).await?;
        Ok(message.content.unwrap_or_default())
    }
}

#[async_trait]
impl ChatModel for OpenAiProvider {
    async fn step(
        &self,
        system: &str,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelStep, LlmError> {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        wire_messages.push(WireMessage {
            role: "system".to_string(),
            content: Some(system.to_string()),
            tool_calls: None,
            tool_call_id: None,
        });
        wire_messages.extend(messages.iter().map(to_wire));

        let body = CompletionsRequest {
            model: self.model.clone(),
            messages: wire_messages,
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.iter().map(to_wire_tool).collect())
            },
            stream: false,
        };

        debug!(
            "Chat step: {} messages, {} tools",
            messages.len(),
            tools.len()
        );

        let message = self.request(&body).await?;

        let tool_calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|c| ToolCallRequest {
                id: c.id,
                name: c.function.name,
                arguments: c.function.arguments,
            })
            .collect::<Vec<_>>();

        let text = message.content.filter(|t| !t.is_empty());

        if text.is_none() && tool_calls.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Model returned neither text nor tool calls".to_string(),
            ));
        }

        Ok(ModelStep { text, tool_calls })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider =
            OpenAiProvider::new("http://localhost:8000", "gpt-4-turbo", "key").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:8000");
        assert_eq!(provider.model, "gpt-4-turbo");
    }

    #[test]
    fn test_wire_message_for_tool_result() {
        let msg = ChatMessage::tool_result("call_1", "updated");
        let wire = to_wire(&msg);
        assert_eq!(wire.role, "tool");
        assert_eq!(wire.tool_call_id.as_deref(), Some("call_1"));
        assert!(wire.tool_calls.is_none());
    }

    #[test]
    fn test_wire_tool_spec_shape() {
        let spec = ToolSpec {
            name: "update_offer".to_string(),
            description: "Update the offer".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        };
        let wire = to_wire_tool(&spec);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "update_offer");
    }

    #[test]
    fn test_parse_tool_call_response() {
        let json = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "update_offer",
                            "arguments": "{\"feedback\": \"raise the price\"}"
                        }
                    }]
                }
            }]
        }"#;

        let parsed: CompletionsResponse = serde_json::from_str(json).unwrap();
        let message = parsed.choices.into_iter().next().unwrap().message;
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "update_offer");
    }

    // Integration test (requires a live backend)
    #[tokio::test]
    #[ignore]
    async fn test_generate_integration() {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let provider = OpenAiProvider::default_endpoint("gpt-4-turbo", api_key).unwrap();
        let result = provider.generate("Say 'hello' and nothing else").await;

        if let Ok(text) = result {
            assert!(!text.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors() {
        let provider =
            OpenAiProvider::new("http://127.0.0.1:1", "gpt-4-turbo", "key").unwrap();
        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
