//! Router — maps the latest model message to the next action.
//!
//! No semantic validation happens here: tool names the model invented are
//! passed through and fail later at the registry as `ToolError::NotFound`,
//! which the loop controller feeds back to the model as tool-result text.

use rummage_core::message::Message;
use rummage_core::tool::ToolCall;

/// The next step for the loop controller.
#[derive(Debug)]
pub enum Action {
    /// The message carries no tool calls: terminate with this answer.
    Finish(String),

    /// Execute these tools, in the order the model listed them.
    RunTools(Vec<ToolCall>),
}

/// Inspect the model's latest message and decide the next step.
pub fn decide(last_message: &Message) -> Action {
    if last_message.tool_calls.is_empty() {
        return Action::Finish(last_message.content.clone());
    }

    let calls = last_message
        .tool_calls
        .iter()
        .map(|tc| ToolCall {
            id: tc.id.clone(),
            name: tc.name.clone(),
            // Unparseable argument JSON is left for the tool to reject.
            arguments: serde_json::from_str(&tc.arguments).unwrap_or(serde_json::Value::Null),
        })
        .collect();

    Action::RunTools(calls)
}
