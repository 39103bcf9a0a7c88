//! Conversation transcript types
//!
//! One editing session keeps an append-only transcript of turns. Entries
//! are never rewritten: a tool invocation whose result was superseded by a
//! later one in the same turn stays in the transcript, it just is not the
//! one applied to the document.

use serde::{Deserialize, Serialize};

/// The assistant greeting that opens every editing session transcript
pub const SESSION_GREETING: &str =
    "Hello! I'm here to help you update your real estate offer. What changes would you like to make?";

/// The system role line seeding the transcript
pub const SESSION_SYSTEM_NOTE: &str =
    "You are a helpful assistant specializing in real estate offers.";

/// Role of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System framing, never shown to the user
    System,
    /// A message typed by the user
    User,
    /// Assistant text or a tool invocation the assistant requested
    Assistant,
}

/// Result of a completed `update_offer` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    /// Short confirmation shown in the chat
    pub confirmation: String,

    /// The full replacement document produced by the rewrite
    pub updated_offer: String,
}

/// A capability invocation recorded in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    /// Capability name (currently always "update_offer")
    pub name: String,

    /// Raw JSON arguments the model supplied
    pub arguments: serde_json::Value,

    /// Outcome, absent when the invocation failed
    pub result: Option<ToolOutcome>,
}

impl ToolInvocation {
    /// Whether this invocation produced a usable replacement document
    pub fn produced_document(&self) -> bool {
        self.result
            .as_ref()
            .map(|r| !r.updated_offer.trim().is_empty())
            .unwrap_or(false)
    }
}

/// One entry in the session transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    /// Who produced the entry
    pub role: ChatRole,

    /// Plain text, absent for pure tool-invocation entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Tool invocation, absent for plain text entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolInvocation>,
}

impl TranscriptEntry {
    /// A plain user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: Some(text.into()),
            tool_call: None,
        }
    }

    /// A plain assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: Some(text.into()),
            tool_call: None,
        }
    }

    /// The system framing entry
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            text: Some(text.into()),
            tool_call: None,
        }
    }

    /// An assistant entry recording a tool invocation
    pub fn tool(invocation: ToolInvocation) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: None,
            tool_call: Some(invocation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produced_document() {
        let mut inv = ToolInvocation {
            name: "update_offer".to_string(),
            arguments: serde_json::json!({"feedback": "raise the price"}),
            result: None,
        };
        assert!(!inv.produced_document());

        inv.result = Some(ToolOutcome {
            confirmation: "done".to_string(),
            updated_offer: "  ".to_string(),
        });
        assert!(!inv.produced_document());

        inv.result.as_mut().unwrap().updated_offer = "# Offer".to_string();
        assert!(inv.produced_document());
    }

    #[test]
    fn test_entry_constructors() {
        let user = TranscriptEntry::user("hello");
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.text.as_deref(), Some("hello"));
        assert!(user.tool_call.is_none());

        let tool = TranscriptEntry::tool(ToolInvocation {
            name: "update_offer".to_string(),
            arguments: serde_json::Value::Null,
            result: None,
        });
        assert_eq!(tool.role, ChatRole::Assistant);
        assert!(tool.text.is_none());
        assert!(tool.tool_call.is_some());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
