//! Tool trait — the abstraction over external lookup backends.
//!
//! A tool takes a free-text query and returns document text: the
//! encyclopedia lookup and the general web search both fit this shape.
//! Tools are registered in the ToolRegistry; the loop controller executes
//! whichever tools the model requests, in the order requested.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ToolError;
use crate::model::ToolDefinition;

/// A request to execute a tool, decoded from a model tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the model's tool_call id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// The call ID this result is for
    pub call_id: String,

    /// The resulting text
    pub output: String,

    /// Which tool produced this result (shown to the user)
    pub source: String,
}

/// The core Tool trait.
///
/// Both lookup tools (wikipedia, web_search) implement this trait and are
/// registered in the ToolRegistry so the loop controller can dispatch to
/// them by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "wikipedia").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// The user-facing source label (e.g., "Wikipedia").
    fn source_label(&self) -> &str {
        self.name()
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The loop controller uses this to:
/// 1. Get tool definitions to send to the model
/// 2. Look up and execute tools when the model requests them
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call. An unknown name is a [`ToolError::NotFound`],
    /// never a panic.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolOutcome, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        let output = tool.execute(call.arguments.clone()).await?;
        Ok(ToolOutcome {
            call_id: call.id.clone(),
            output,
            source: tool.source_label().to_string(),
        })
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
