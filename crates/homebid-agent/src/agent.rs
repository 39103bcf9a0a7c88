//! The per-turn tool loop

use crate::error::AgentError;
use crate::session::EditSession;
use homebid_domain::{ChatRole as TranscriptRole, ToolInvocation, ToolOutcome, TranscriptEntry};
use homebid_llm::{ChatMessage, ChatModel, ToolCallRequest, ToolSpec};
use homebid_rewriter::Rewriter;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Model steps allowed per user turn
pub const MAX_MODEL_STEPS: usize = 5;

/// Name of the single capability the model may invoke
pub const UPDATE_TOOL_NAME: &str = "update_offer";

/// Generic per-step failure message recorded when a rewrite errors
pub const TOOL_FAILURE_MESSAGE: &str =
    "An error occurred while updating the offer. Please try again.";

/// Phase of the per-turn state machine
///
/// `Idle` holds between turns; a submitted turn cycles through
/// `AwaitingModel`, `ToolInvoked`, and `AwaitingToolResult` until the model
/// stops requesting steps or the budget runs out, then reaches `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No turn in flight
    Idle,
    /// Waiting for the next model step
    AwaitingModel,
    /// The model requested the update capability
    ToolInvoked,
    /// The rewrite is executing
    AwaitingToolResult,
    /// The turn is complete
    Done,
}

/// What one user turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant's closing text for the turn
    pub reply: String,

    /// The replacement document, when a rewrite result was applied.
    /// At most one per turn, no matter how many invocations succeeded.
    pub updated_document: Option<String>,

    /// Model steps consumed (1..=MAX_MODEL_STEPS)
    pub steps_used: usize,
}

/// Arguments of the update capability as supplied by the model
#[derive(Debug, Deserialize)]
struct UpdateArgs {
    #[serde(default)]
    current_offer: Option<String>,
    feedback: String,
}

/// Specification of the update capability advertised to the model
pub fn update_tool_spec() -> ToolSpec {
    ToolSpec {
        name: UPDATE_TOOL_NAME.to_string(),
        description: "Update the real estate offer based on user feedback".to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "current_offer": {
                    "type": "string",
                    "description": "The current offer content"
                },
                "feedback": {
                    "type": "string",
                    "description": "User feedback to incorporate into the offer"
                }
            },
            "required": ["feedback"]
        }),
    }
}

/// Drives the conversational update loop over one editing session
///
/// Holds the chat model and the rewriter; all session state lives in the
/// `EditSession` passed to each turn.
#[derive(Clone)]
pub struct UpdateAgent {
    model: Arc<dyn ChatModel>,
    rewriter: Rewriter,
}

impl UpdateAgent {
    /// Create an agent over the given model and rewriter
    pub fn new(model: Arc<dyn ChatModel>, rewriter: Rewriter) -> Self {
        Self { model, rewriter }
    }

    /// Run one user turn to completion
    ///
    /// Rejects the turn when one is already in flight; otherwise the
    /// `processing` flag is set for the whole turn, covering model latency
    /// and capability execution alike.
    pub async fn run_turn(
        &self,
        session: &mut EditSession,
        user_message: &str,
    ) -> Result<TurnOutcome, AgentError> {
        if session.is_processing() {
            return Err(AgentError::TurnInFlight);
        }

        session.set_processing(true);
        let result = self.drive_turn(session, user_message).await;
        session.set_processing(false);

        result
    }

    async fn drive_turn(
        &self,
        session: &mut EditSession,
        user_message: &str,
    ) -> Result<TurnOutcome, AgentError> {
        let system = system_prompt(session.document());
        let tools = [update_tool_spec()];

        session.push_entry(TranscriptEntry::user(user_message));
        let mut messages = conversation_messages(session);

        let mut phase = TurnPhase::AwaitingModel;
        let mut steps_used = 0;
        let mut invocations: Vec<ToolInvocation> = Vec::new();
        let mut closing_text: Option<String> = None;

        while phase != TurnPhase::Done {
            debug!(?phase, steps_used, "turn step");

            let step = self.model.step(&system, &messages, &tools).await?;
            steps_used += 1;

            if step.requests_tools() {
                if let Some(text) = &step.text {
                    session.push_entry(TranscriptEntry::assistant(text.clone()));
                }
                messages.push(ChatMessage {
                    role: homebid_llm::ChatRole::Assistant,
                    content: step.text.clone(),
                    tool_calls: step.tool_calls.clone(),
                    tool_call_id: None,
                });

                for call in &step.tool_calls {
                    phase = TurnPhase::ToolInvoked;
                    debug!(?phase, call_id = %call.id, "capability requested");

                    phase = TurnPhase::AwaitingToolResult;
                    let (invocation, result_message) =
                        self.execute_update(session, call).await;

                    session.push_entry(TranscriptEntry::tool(invocation.clone()));
                    invocations.push(invocation);
                    messages.push(ChatMessage::tool_result(call.id.clone(), result_message));
                }

                phase = if steps_used >= MAX_MODEL_STEPS {
                    debug!("step budget exhausted");
                    TurnPhase::Done
                } else {
                    TurnPhase::AwaitingModel
                };
            } else {
                let text = step.text.unwrap_or_default();
                session.push_entry(TranscriptEntry::assistant(text.clone()));
                messages.push(ChatMessage::assistant(text.clone()));
                closing_text = Some(text);
                phase = TurnPhase::Done;
            }
        }

        // Latest result wins: scan this turn's invocations from most recent
        // to oldest and apply the first one with a non-empty document.
        let updated_document = invocations
            .iter()
            .rev()
            .find(|inv| inv.produced_document())
            .and_then(|inv| inv.result.as_ref())
            .map(|outcome| outcome.updated_offer.clone());

        if let Some(document) = &updated_document {
            session.apply_document(document.clone());
            info!(
                "Turn applied a rewrite ({} invocations, {} steps)",
                invocations.len(),
                steps_used
            );
        }

        let reply = closing_text.unwrap_or_else(|| {
            invocations
                .iter()
                .rev()
                .find_map(|inv| inv.result.as_ref().map(|r| r.confirmation.clone()))
                .unwrap_or_else(|| "I've processed your request.".to_string())
        });

        phase = TurnPhase::Idle;
        debug!(?phase, "turn complete");

        Ok(TurnOutcome {
            reply,
            updated_document,
            steps_used,
        })
    }

    /// Execute one update invocation; never fails the turn
    ///
    /// Returns the transcript record and the text fed back to the model as
    /// the step outcome.
    async fn execute_update(
        &self,
        session: &EditSession,
        call: &ToolCallRequest,
    ) -> (ToolInvocation, String) {
        let arguments: serde_json::Value =
            serde_json::from_str(&call.arguments).unwrap_or(serde_json::Value::Null);

        let args: UpdateArgs = match serde_json::from_str(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!("Malformed update_offer arguments: {}", e);
                return (
                    ToolInvocation {
                        name: call.name.clone(),
                        arguments,
                        result: None,
                    },
                    TOOL_FAILURE_MESSAGE.to_string(),
                );
            }
        };

        let current = args
            .current_offer
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| session.document());

        match self.rewriter.apply_feedback(current, &args.feedback).await {
            Ok(updated_offer) => {
                let outcome = ToolOutcome {
                    confirmation: format!(
                        "I've updated the offer based on your feedback: \"{}\"",
                        args.feedback
                    ),
                    updated_offer,
                };
                let result_message = serde_json::to_string(&outcome)
                    .unwrap_or_else(|_| outcome.confirmation.clone());

                (
                    ToolInvocation {
                        name: call.name.clone(),
                        arguments,
                        result: Some(outcome),
                    },
                    result_message,
                )
            }
            Err(e) => {
                warn!("Offer update failed: {}", e);
                (
                    ToolInvocation {
                        name: call.name.clone(),
                        arguments,
                        result: None,
                    },
                    TOOL_FAILURE_MESSAGE.to_string(),
                )
            }
        }
    }
}

/// System framing for a turn, embedding the current document
fn system_prompt(document: &str) -> String {
    format!(
        "You are a helpful assistant specializing in real estate offers.\n\
         Provide concise summaries of changes made to the offer without repeating the entire document.\n\
         Here is the current offer:\n\n{}",
        document
    )
}

/// Project the transcript into chat messages for the model
///
/// The system framing is rebuilt per turn with the current document, so
/// system entries are skipped. Tool invocations from earlier turns are
/// replayed as their confirmation text; the full call/result pairing only
/// exists within the turn that produced it.
fn conversation_messages(session: &EditSession) -> Vec<ChatMessage> {
    session
        .transcript()
        .iter()
        .filter_map(|entry| match entry.role {
            TranscriptRole::System => None,
            TranscriptRole::User => entry.text.as_ref().map(|t| ChatMessage::user(t.clone())),
            TranscriptRole::Assistant => {
                if let Some(text) = &entry.text {
                    Some(ChatMessage::assistant(text.clone()))
                } else {
                    entry
                        .tool_call
                        .as_ref()
                        .and_then(|inv| inv.result.as_ref())
                        .map(|r| ChatMessage::assistant(r.confirmation.clone()))
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use homebid_llm::{LlmError, MockChatModel, MockProvider, ModelStep};
    use homebid_rewriter::PromptBuilder;

    const DOC: &str = "# Offer\n\nClosing Date: June 1";

    fn tool_call(id: &str, feedback: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: id.to_string(),
            name: UPDATE_TOOL_NAME.to_string(),
            arguments: serde_json::json!({ "feedback": feedback }).to_string(),
        }
    }

    fn agent_with(model: MockChatModel, provider: MockProvider) -> UpdateAgent {
        UpdateAgent::new(Arc::new(model), Rewriter::new(Arc::new(provider)))
    }

    /// Mock provider keyed by the exact rewrite prompt the agent will build
    fn provider_for(feedback: &str, response: &str) -> MockProvider {
        let mut provider = MockProvider::new("unexpected prompt");
        provider.add_response(PromptBuilder::new(DOC).for_feedback(feedback), response);
        provider
    }

    #[tokio::test]
    async fn test_no_op_turn_leaves_document_unchanged() {
        let model = MockChatModel::with_steps(vec![ModelStep::text(
            "You could consider raising the earnest money deposit.",
        )]);
        let agent = agent_with(model, MockProvider::new("should not be called"));

        let mut session = EditSession::new(DOC);
        let before = session.transcript().len();
        let outcome = agent.run_turn(&mut session, "any advice?").await.unwrap();

        assert_eq!(session.document(), DOC);
        assert!(outcome.updated_document.is_none());
        assert_eq!(outcome.steps_used, 1);
        // user message + assistant reply were appended
        assert_eq!(session.transcript().len(), before + 2);
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn test_update_applies_and_confirms_feedback() {
        let feedback = "change closing date to July 1";
        let updated = "# Offer\n\nClosing Date: July 1";

        let model = MockChatModel::with_steps(vec![
            ModelStep::tool_calls(vec![tool_call("call_1", feedback)]),
            ModelStep::text("I've moved the closing date."),
        ]);
        let agent = agent_with(model, provider_for(feedback, updated));

        let mut session = EditSession::new(DOC);
        let outcome = agent.run_turn(&mut session, feedback).await.unwrap();

        assert_eq!(session.document(), updated);
        assert_eq!(outcome.updated_document.as_deref(), Some(updated));
        assert_eq!(outcome.reply, "I've moved the closing date.");
        assert_eq!(outcome.steps_used, 2);

        // The transcript records the invocation with a confirmation that
        // carries the feedback text
        let confirmation = session
            .transcript()
            .iter()
            .find_map(|e| e.tool_call.as_ref())
            .and_then(|inv| inv.result.as_ref())
            .map(|r| r.confirmation.clone())
            .unwrap();
        assert!(confirmation.contains(feedback));
    }

    #[tokio::test]
    async fn test_latest_invocation_wins() {
        let d1 = "# Offer v1";
        let d2 = "# Offer v2";

        let mut provider = MockProvider::new("unexpected prompt");
        provider.add_response(PromptBuilder::new(DOC).for_feedback("first change"), d1);
        provider.add_response(PromptBuilder::new(DOC).for_feedback("second change"), d2);

        let model = MockChatModel::with_steps(vec![
            ModelStep::tool_calls(vec![
                tool_call("call_1", "first change"),
                tool_call("call_2", "second change"),
            ]),
            ModelStep::text("Both changes considered."),
        ]);
        let agent = agent_with(model, provider);

        let mut session = EditSession::new(DOC);
        let outcome = agent.run_turn(&mut session, "do both").await.unwrap();

        // The most recent result is authoritative
        assert_eq!(session.document(), d2);
        assert_eq!(outcome.updated_document.as_deref(), Some(d2));

        // The earlier invocation is still in the transcript, unapplied
        let recorded: Vec<_> = session
            .transcript()
            .iter()
            .filter_map(|e| e.tool_call.as_ref())
            .collect();
        assert_eq!(recorded.len(), 2);
        assert_eq!(
            recorded[0].result.as_ref().unwrap().updated_offer,
            d1.to_string()
        );
    }

    #[tokio::test]
    async fn test_failed_rewrite_keeps_document_and_conversation() {
        let feedback = "make it worse";
        let mut provider = MockProvider::new("unexpected prompt");
        provider.add_error(PromptBuilder::new(DOC).for_feedback(feedback));

        let model = MockChatModel::with_steps(vec![
            ModelStep::tool_calls(vec![tool_call("call_1", feedback)]),
            ModelStep::text("Sorry, that didn't work."),
        ]);
        let agent = agent_with(model, provider);

        let mut session = EditSession::new(DOC);
        let outcome = agent.run_turn(&mut session, feedback).await.unwrap();

        assert_eq!(session.document(), DOC);
        assert!(outcome.updated_document.is_none());

        let invocation = session
            .transcript()
            .iter()
            .find_map(|e| e.tool_call.as_ref())
            .unwrap();
        assert!(invocation.result.is_none());
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn test_step_budget_bounds_the_turn() {
        // A model that never stops asking for updates
        let steps: Vec<ModelStep> = (0..10)
            .map(|i| {
                ModelStep::tool_calls(vec![tool_call(
                    &format!("call_{}", i),
                    &format!("change {}", i),
                )])
            })
            .collect();
        let model = MockChatModel::with_steps(steps);
        let model_probe = model.clone();

        let agent = agent_with(model, MockProvider::new("# Rewritten"));

        let mut session = EditSession::new(DOC);
        let outcome = agent.run_turn(&mut session, "go wild").await.unwrap();

        assert_eq!(outcome.steps_used, MAX_MODEL_STEPS);
        assert_eq!(model_probe.call_count(), MAX_MODEL_STEPS);
        // The budget still surfaces exactly one applied rewrite
        assert_eq!(session.document(), "# Rewritten");
        assert_eq!(outcome.updated_document.as_deref(), Some("# Rewritten"));
    }

    #[tokio::test]
    async fn test_turn_in_flight_is_rejected() {
        let model = MockChatModel::with_steps(vec![ModelStep::text("hi")]);
        let agent = agent_with(model, MockProvider::default());

        let mut session = EditSession::new(DOC);
        session.set_processing(true);

        let result = agent.run_turn(&mut session, "hello").await;
        assert!(matches!(result, Err(AgentError::TurnInFlight)));
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn step(
            &self,
            _system: &str,
            _messages: &[ChatMessage],
            _tools: &[ToolSpec],
        ) -> Result<ModelStep, LlmError> {
            Err(LlmError::Communication("backend down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_terminal_and_clears_processing() {
        let agent = UpdateAgent::new(
            Arc::new(FailingModel),
            Rewriter::new(Arc::new(MockProvider::default())),
        );

        let mut session = EditSession::new(DOC);
        let result = agent.run_turn(&mut session, "hello").await;

        assert!(matches!(result, Err(AgentError::Model(_))));
        assert_eq!(session.document(), DOC);
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn test_malformed_arguments_do_not_advance_document() {
        let model = MockChatModel::with_steps(vec![
            ModelStep::tool_calls(vec![ToolCallRequest {
                id: "call_1".to_string(),
                name: UPDATE_TOOL_NAME.to_string(),
                arguments: "not json at all".to_string(),
            }]),
            ModelStep::text("Something went sideways."),
        ]);
        let agent = agent_with(model, MockProvider::new("should not be used"));

        let mut session = EditSession::new(DOC);
        let outcome = agent.run_turn(&mut session, "try").await.unwrap();

        assert_eq!(session.document(), DOC);
        assert!(outcome.updated_document.is_none());
    }

    #[tokio::test]
    async fn test_tool_results_are_fed_back_to_the_model() {
        let feedback = "change closing date to July 1";
        let model = MockChatModel::with_steps(vec![
            ModelStep::tool_calls(vec![tool_call("call_1", feedback)]),
            ModelStep::text("done"),
        ]);
        let model_probe = model.clone();
        let agent = agent_with(model, provider_for(feedback, "# New"));

        let mut session = EditSession::new(DOC);
        agent.run_turn(&mut session, feedback).await.unwrap();

        let counts = model_probe.seen_message_counts();
        assert_eq!(counts.len(), 2);
        // Second step sees the assistant tool-call message and the tool
        // result on top of what the first step saw
        assert_eq!(counts[1], counts[0] + 2);
    }
}
