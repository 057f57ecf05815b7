//! ModelClient trait — the abstraction over the remote language model.
//!
//! A ModelClient sends an ordered conversation plus the available tool
//! schemas to the model service and gets back a single message: either a
//! final answer or one or more tool invocation requests. The loop controller
//! calls `complete()` without knowing which backend is behind it, which is
//! what keeps the turn logic testable with scripted mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::message::Message;

/// A request to the model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The model to use (e.g., "gemini-1.5-flash")
    pub model: String,

    /// The conversation messages, in order
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.1
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete response from the model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated assistant message (answer text and/or tool calls)
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core ModelClient trait.
///
/// Every call consumes one unit of remote quota; there is no automatic
/// retry. Failures propagate as [`ModelError`] and abort the current turn.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the assembled conversation and get one message back.
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
