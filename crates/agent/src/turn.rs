//! The loop controller — one question-answer turn as a state machine.
//!
//! States: `AwaitingModel` → (`AwaitingTools` ↔ `AwaitingModel`) →
//! `Done` | `Aborted`. A step is one model call that requests tools; a model
//! turn requesting several tools still costs one step. The step ceiling
//! bounds worst-case latency and API cost while allowing a few rounds of
//! tool chaining.

use std::sync::Arc;

use chrono::Utc;
use rummage_core::error::Error;
use rummage_core::event::{EventBus, TurnEvent};
use rummage_core::message::{Conversation, Message};
use rummage_core::model::{ModelClient, ModelRequest};
use rummage_core::tool::{ToolCall, ToolRegistry};
use tracing::{debug, info, warn};

use crate::prompt;
use crate::router::{self, Action};

/// The fixed user-visible text for a turn that hit the step ceiling.
pub const STEP_LIMIT_MESSAGE: &str =
    "I reached the step limit without a final answer. Please try rephrasing your question.";

/// Shown as the source when no tool contributed to the answer.
pub const NO_SOURCE_LABEL: &str = "none";

/// The phases of one turn.
enum TurnState {
    /// Waiting for the model to answer or request tools.
    AwaitingModel,

    /// Executing the tools the model requested, in order.
    AwaitingTools(Vec<ToolCall>),

    /// Terminal: the model produced a final answer.
    Done(String),

    /// Terminal: the step ceiling was hit before a final answer.
    Aborted,
}

/// The result of a completed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The final answer text (or the fixed step-limit message).
    pub answer: String,

    /// Which tool supplied supporting material, if any.
    pub source: Option<String>,

    /// How many tool-requesting model calls the turn used.
    pub steps: u32,

    /// True when the turn was aborted at the step ceiling.
    pub step_limit_reached: bool,

    /// The full message history of the turn (never persisted).
    pub conversation: Conversation,
}

impl TurnOutcome {
    /// The user-facing source label.
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or(NO_SOURCE_LABEL)
    }
}

/// Drives the {model → router → tools → model} cycle for one user turn.
///
/// Holds only process-wide handles; all per-turn state (conversation, step
/// counter) is local to [`TurnRunner::run`] and discarded when it returns.
pub struct TurnRunner {
    client: Arc<dyn ModelClient>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    max_steps: u32,
    events: Arc<EventBus>,
}

impl TurnRunner {
    /// Create a new turn runner.
    pub fn new(
        client: Arc<dyn ModelClient>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        system_prompt: impl Into<String>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            system_prompt: system_prompt.into(),
            max_steps: 10,
            events,
        }
    }

    /// Build a runner from the application config.
    pub fn from_config(
        client: Arc<dyn ModelClient>,
        tools: Arc<ToolRegistry>,
        events: Arc<EventBus>,
        config: &rummage_config::AppConfig,
    ) -> Self {
        let mut runner = Self::new(
            client,
            &config.model,
            config.temperature,
            tools,
            prompt::system_prompt(&config.knowledge_cutoff),
            events,
        )
        .with_max_steps(config.max_steps);
        runner.max_tokens = config.max_tokens;
        runner
    }

    /// Set the step ceiling.
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    /// Set the maximum tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Run one full turn for the given question.
    ///
    /// Tool failures are fed back to the model as tool-result text and never
    /// abort the turn; a `ModelError` does, and propagates as `Err`.
    pub async fn run(&self, question: &str) -> Result<TurnOutcome, Error> {
        let mut conversation = Conversation::new();
        conversation.push(Message::system(&self.system_prompt));
        conversation.push(Message::user(question));

        let tool_definitions = self.tools.definitions();
        let mut steps: u32 = 0;
        let mut state = TurnState::AwaitingModel;

        info!(question_len = question.len(), "Starting turn");

        loop {
            match state {
                TurnState::AwaitingModel => {
                    self.events.publish(TurnEvent::ModelCalled {
                        step: steps + 1,
                        timestamp: Utc::now(),
                    });

                    let request = ModelRequest {
                        model: self.model.clone(),
                        messages: conversation.messages.clone(),
                        temperature: self.temperature,
                        max_tokens: self.max_tokens,
                        tools: tool_definitions.clone(),
                    };

                    // A ModelError aborts the whole turn; the session loop
                    // reports it and stays alive.
                    let response = self.client.complete(request).await?;

                    match router::decide(&response.message) {
                        Action::Finish(answer) => {
                            conversation.push(response.message);
                            state = TurnState::Done(answer);
                        }
                        Action::RunTools(calls) => {
                            if steps >= self.max_steps {
                                warn!(steps, "Step ceiling reached without a final answer");
                                state = TurnState::Aborted;
                            } else {
                                steps += 1;
                                debug!(step = steps, tools = calls.len(), "Model requested tools");
                                conversation.push(response.message);
                                state = TurnState::AwaitingTools(calls);
                            }
                        }
                    }
                }

                TurnState::AwaitingTools(calls) => {
                    for call in &calls {
                        self.run_tool(call, &mut conversation).await;
                    }
                    state = TurnState::AwaitingModel;
                }

                TurnState::Done(answer) => {
                    let source = conversation.last_tool_source().map(String::from);
                    info!(steps, source = source.as_deref().unwrap_or(NO_SOURCE_LABEL), "Turn done");
                    return Ok(TurnOutcome {
                        answer,
                        source,
                        steps,
                        step_limit_reached: false,
                        conversation,
                    });
                }

                TurnState::Aborted => {
                    let source = conversation.last_tool_source().map(String::from);
                    return Ok(TurnOutcome {
                        answer: STEP_LIMIT_MESSAGE.into(),
                        source,
                        steps,
                        step_limit_reached: true,
                        conversation,
                    });
                }
            }
        }
    }

    /// Execute one tool call and append its result to the conversation.
    /// Failures become tool-result text so the model can recover.
    async fn run_tool(&self, call: &ToolCall, conversation: &mut Conversation) {
        let query = call.arguments["query"].as_str().unwrap_or("").to_string();
        self.events.publish(TurnEvent::ToolStarted {
            tool_name: call.name.clone(),
            query,
            timestamp: Utc::now(),
        });

        let start = std::time::Instant::now();
        let result = self.tools.execute(call).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                self.events.publish(TurnEvent::ToolFinished {
                    tool_name: call.name.clone(),
                    success: true,
                    duration_ms,
                    timestamp: Utc::now(),
                });
                conversation.push(
                    Message::tool_result(&outcome.call_id, &outcome.output)
                        .with_source(&outcome.source),
                );
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                self.events.publish(TurnEvent::ToolFinished {
                    tool_name: call.name.clone(),
                    success: false,
                    duration_ms,
                    timestamp: Utc::now(),
                });
                // Error results carry no source label.
                conversation.push(Message::tool_result(&call.id, format!("Error: {e}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use rummage_core::error::ModelError;
    use rummage_core::message::Role;

    fn runner(client: Arc<dyn ModelClient>, registry: ToolRegistry) -> TurnRunner {
        TurnRunner::new(
            client,
            "mock-model",
            0.1,
            Arc::new(registry),
            prompt::system_prompt("2024"),
            Arc::new(EventBus::default()),
        )
    }

    #[tokio::test]
    async fn wikipedia_turn_yields_five_messages_and_label() {
        let client = Arc::new(SequentialMockClient::new(vec![
            Ok(tool_call_response(vec![scripted_call("c1", "wikipedia", "quantum computing")])),
            Ok(text_response("Quantum computing uses qubits.")),
        ]));
        let outcome = runner(client, scripted_registry())
            .run("What is quantum computing?")
            .await
            .unwrap();

        assert_eq!(outcome.answer, "Quantum computing uses qubits.");
        assert_eq!(outcome.source_label(), "Wikipedia");
        assert_eq!(outcome.steps, 1);
        assert!(!outcome.step_limit_reached);
        // system, user, assistant tool-request, tool-result, final assistant
        assert_eq!(outcome.conversation.messages.len(), 5);
        assert_eq!(outcome.conversation.messages[3].role, Role::Tool);
    }

    #[tokio::test]
    async fn web_search_turn_gets_web_label() {
        let client = Arc::new(SequentialMockClient::new(vec![
            Ok(tool_call_response(vec![scripted_call("c1", "web_search", "OpenAI 2024")])),
            Ok(text_response("Several things happened.")),
        ]));
        let outcome = runner(client, scripted_registry())
            .run("What happened with OpenAI in 2024?")
            .await
            .unwrap();

        assert_eq!(outcome.source_label(), "Web Search (DuckDuckGo)");
    }

    #[tokio::test]
    async fn direct_answer_has_no_source() {
        let client = Arc::new(SequentialMockClient::new(vec![Ok(text_response("Hello!"))]));
        let outcome = runner(client, scripted_registry()).run("Hi").await.unwrap();

        assert_eq!(outcome.answer, "Hello!");
        assert_eq!(outcome.source_label(), "none");
        assert_eq!(outcome.steps, 0);
        // system, user, final assistant
        assert_eq!(outcome.conversation.messages.len(), 3);
    }

    #[tokio::test]
    async fn perpetual_tool_requests_abort_at_step_ceiling() {
        let client = Arc::new(RepeatingToolClient::new("wikipedia", "anything"));
        let outcome = runner(client.clone(), scripted_registry())
            .with_max_steps(3)
            .run("loop forever")
            .await
            .unwrap();

        assert!(outcome.step_limit_reached);
        assert_eq!(outcome.answer, STEP_LIMIT_MESSAGE);
        assert_eq!(outcome.steps, 3);
        // One final model call observes the ceiling without incrementing.
        assert_eq!(client.call_count(), 4);
    }

    #[tokio::test]
    async fn model_error_aborts_the_turn() {
        let client = Arc::new(SequentialMockClient::new(vec![Err(ModelError::Network(
            "connection reset".into(),
        ))]));
        let err = runner(client, scripted_registry())
            .run("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::Network(_))));
    }

    #[tokio::test]
    async fn unknown_tool_is_surfaced_as_tool_result_text() {
        let client = Arc::new(SequentialMockClient::new(vec![
            Ok(tool_call_response(vec![scripted_call("c1", "maps", "paris")])),
            Ok(text_response("I could not look that up.")),
        ]));
        let outcome = runner(client, scripted_registry())
            .run("Where is Paris?")
            .await
            .unwrap();

        // The turn completed; the failure went back to the model as text.
        assert_eq!(outcome.answer, "I could not look that up.");
        assert_eq!(outcome.source_label(), "none");
        let tool_msg = &outcome.conversation.messages[3];
        assert_eq!(tool_msg.role, Role::Tool);
        assert!(tool_msg.content.contains("Tool not found: maps"));
        assert!(tool_msg.source.is_none());
    }

    #[tokio::test]
    async fn failing_tool_does_not_abort_the_turn() {
        let client = Arc::new(SequentialMockClient::new(vec![
            Ok(tool_call_response(vec![scripted_call("c1", "broken", "x")])),
            Ok(text_response("Sorry, the search failed.")),
        ]));
        let outcome = runner(client, scripted_registry())
            .run("anything")
            .await
            .unwrap();

        assert_eq!(outcome.answer, "Sorry, the search failed.");
        let tool_msg = &outcome.conversation.messages[3];
        assert!(tool_msg.content.starts_with("Error:"));
    }

    #[tokio::test]
    async fn multiple_tools_in_one_turn_cost_one_step_in_order() {
        let client = Arc::new(SequentialMockClient::new(vec![
            Ok(tool_call_response(vec![
                scripted_call("c1", "wikipedia", "a"),
                scripted_call("c2", "web_search", "b"),
            ])),
            Ok(text_response("Combined answer.")),
        ]));
        let outcome = runner(client, scripted_registry())
            .run("compare")
            .await
            .unwrap();

        assert_eq!(outcome.steps, 1);
        // Results appended in request order.
        let msgs = &outcome.conversation.messages;
        assert_eq!(msgs[3].tool_call_id.as_deref(), Some("c1"));
        assert_eq!(msgs[4].tool_call_id.as_deref(), Some("c2"));
        // The web search ran last, so it is the source label.
        assert_eq!(outcome.source_label(), "Web Search (DuckDuckGo)");
    }
}
