//! Chat wire types shared by providers and the agent loop
//!
//! These mirror the OpenAI-compatible chat-completions shapes: a message
//! list with tool-call requests and tool results, plus tool specifications
//! advertised to the model.

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System framing for the conversation
    System,
    /// End-user message
    User,
    /// Model output (text and/or tool-call requests)
    Assistant,
    /// Result of executing a tool the model requested
    Tool,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back in the tool result
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// JSON-encoded arguments as produced by the model
    pub arguments: String,
}

/// One message in a chat exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the message
    pub role: ChatRole,

    /// Text content, absent for pure tool-call messages
    pub content: Option<String>,

    /// Tool calls requested by an assistant message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Call id this message answers (tool results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// An assistant text message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// An assistant message requesting tool calls
    pub fn assistant_tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: None,
            tool_calls: calls,
            tool_call_id: None,
        }
    }

    /// A tool result answering the given call id
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A tool the model may invoke
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Tool name the model refers to
    pub name: String,

    /// What the tool does, shown to the model
    pub description: String,

    /// JSON Schema of the arguments object
    pub parameters: serde_json::Value,
}

/// The model's output for a single step of a conversation
///
/// Either text, tool-call requests, or both. An empty step (neither) is a
/// provider bug and is treated as an invalid response upstream.
#[derive(Debug, Clone, Default)]
pub struct ModelStep {
    /// Text the model produced, if any
    pub text: Option<String>,

    /// Tool calls the model requested, in order
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelStep {
    /// A pure text step
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A pure tool-call step
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: None,
            tool_calls: calls,
        }
    }

    /// Whether this step requests any tool execution
    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::user("hi");
        assert_eq!(msg.role, ChatRole::User);
        assert_eq!(msg.content.as_deref(), Some("hi"));

        let result = ChatMessage::tool_result("call_1", "done");
        assert_eq!(result.role, ChatRole::Tool);
        assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_step_requests_tools() {
        assert!(!ModelStep::text("hello").requests_tools());
        assert!(ModelStep::tool_calls(vec![ToolCallRequest {
            id: "call_1".to_string(),
            name: "update_offer".to_string(),
            arguments: "{}".to_string(),
        }])
        .requests_tools());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::Tool).unwrap(), "\"tool\"");
    }
}
