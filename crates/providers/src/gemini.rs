//! Gemini model client.
//!
//! Talks to the Google Generative Language API through its OpenAI-compatible
//! `/chat/completions` endpoint, which keeps the wire format identical to
//! every other OpenAI-compatible backend. Supports tool use / function
//! calling; no streaming, no retries.

use async_trait::async_trait;
use rummage_core::error::ModelError;
use rummage_core::message::{Message, MessageToolCall, Role};
use rummage_core::model::{ModelClient, ModelRequest, ModelResponse, ToolDefinition, Usage};
use serde::Deserialize;
use serde::Serialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Per-request timeout. The original design specifies none; this is a
/// defensive extension so a hung request cannot stall the session forever.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// A Gemini-backed [`ModelClient`].
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client against the default Gemini endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModelError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (proxies, test servers).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ModelError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Build a client from the application config.
    pub fn from_config(config: &rummage_config::AppConfig) -> Result<Self, ModelError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ModelError::AuthenticationFailed("No API key configured".into())
        })?;
        match &config.api_url {
            Some(url) => Self::with_base_url(api_key, url),
            None => Self::new(api_key),
        }
    }

    /// Convert our Message types to the chat-completions wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::Tool => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
            })
            .collect()
    }

    /// Convert tool definitions to the wire format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }

        debug!(model = %request.model, messages = request.messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(e.to_string())
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ModelError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Model service returned error");
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        parse_response(api_response)
    }
}

/// Default backoff when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Read the server's `Retry-After` delay in seconds. Only the delta-seconds
/// form is honored; an HTTP-date value falls back to the default.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Turn the wire response into our domain types.
fn parse_response(api_response: ApiResponse) -> Result<ModelResponse, ModelError> {
    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::MalformedResponse("No choices in response".into()))?;

    let tool_calls: Vec<MessageToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| MessageToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    let mut message = Message::assistant(choice.message.content.unwrap_or_default());
    message.tool_calls = tool_calls;

    let usage = api_response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(ModelResponse {
        message,
        usage,
        model: api_response.model,
    })
}

// --- Wire types ---

#[derive(Serialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Serialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
