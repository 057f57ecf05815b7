//! Shared test helpers: scripted model clients and stub tools.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rummage_core::error::{ModelError, ToolError};
use rummage_core::message::{Message, MessageToolCall};
use rummage_core::model::{ModelClient, ModelRequest, ModelResponse, Usage};
use rummage_core::tool::{Tool, ToolRegistry};

/// A mock model client that returns a sequence of scripted results.
///
/// Each call to `complete` returns the next entry in the queue. Panics if
/// more calls are made than results provided.
pub struct SequentialMockClient {
    responses: Mutex<Vec<Result<ModelResponse, ModelError>>>,
    calls: AtomicUsize,
}

impl SequentialMockClient {
    pub fn new(responses: Vec<Result<ModelResponse, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for SequentialMockClient {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap();
        match responses.get(call) {
            Some(result) => result.clone(),
            None => panic!(
                "SequentialMockClient: no more responses (call #{call}, have {})",
                responses.len()
            ),
        }
    }
}

/// A mock model client that requests the same tool on every call.
pub struct RepeatingToolClient {
    tool_name: String,
    query: String,
    calls: AtomicUsize,
}

impl RepeatingToolClient {
    pub fn new(tool_name: &str, query: &str) -> Self {
        Self {
            tool_name: tool_name.into(),
            query: query.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for RepeatingToolClient {
    fn name(&self) -> &str {
        "repeating_mock"
    }

    async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(tool_call_response(vec![scripted_call(
            &format!("call_{call}"),
            &self.tool_name,
            &self.query,
        )]))
    }
}

/// Create a plain text response (no tool calls).
pub fn text_response(text: &str) -> ModelResponse {
    ModelResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Create a response carrying tool invocation requests.
pub fn tool_call_response(tool_calls: Vec<MessageToolCall>) -> ModelResponse {
    let mut message = Message::assistant("");
    message.tool_calls = tool_calls;
    ModelResponse {
        message,
        usage: None,
        model: "mock-model".into(),
    }
}

/// Create a tool call with a `query` argument.
pub fn scripted_call(id: &str, name: &str, query: &str) -> MessageToolCall {
    MessageToolCall {
        id: id.into(),
        name: name.into(),
        arguments: serde_json::json!({ "query": query }).to_string(),
    }
}

/// A stub lookup tool with a fixed source label and canned output.
struct ScriptedTool {
    name: &'static str,
    label: &'static str,
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "scripted lookup"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        })
    }
    fn source_label(&self) -> &str {
        self.label
    }
    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;
        Ok(format!("[{}] results for {query}", self.name))
    }
}

/// A tool whose backend always fails.
struct BrokenTool;

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }
    fn description(&self) -> &str {
        "always fails"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }
    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        Err(ToolError::SearchFailed {
            tool_name: "broken".into(),
            reason: "backend unreachable".into(),
        })
    }
}

/// A registry mirroring the production tool set, plus a failing tool.
pub fn scripted_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ScriptedTool {
        name: "wikipedia",
        label: "Wikipedia",
    }));
    registry.register(Box::new(ScriptedTool {
        name: "web_search",
        label: "Web Search (DuckDuckGo)",
    }));
    registry.register(Box::new(BrokenTool));
    registry
}
