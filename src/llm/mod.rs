//! LLM module - chat-completion wire types and the client seam.
//!
//! Messages, tool calls and tool schemas follow the OpenAI chat-completions
//! format, which the DIAL proxy speaks for every deployment.

mod dial;

pub use dial::{completions_url, DialClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors talking to a completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Completion response contained no choices")]
    EmptyResponse,
}

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One turn of the conversation, in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,

    /// Text content. Assistant turns that only request tools may carry none.
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "no_tool_calls")]
    pub tool_calls: Option<Vec<ToolCall>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool name, set on tool turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn no_tool_calls(calls: &Option<Vec<ToolCall>>) -> bool {
    calls.as_ref().map_or(true, Vec::is_empty)
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: Option<String>, tool_calls: Option<Vec<ToolCall>>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
            name: None,
        }
    }

    /// A tool result answering the call `tool_call_id`.
    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Text content, or the empty string when absent.
    pub fn text_content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Tool calls requested by this turn (empty for non-assistant turns).
    pub fn requested_tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,

    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,

    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Function name plus its JSON-encoded arguments, exactly as the model sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,

    #[serde(default)]
    pub arguments: String,
}

/// A tool advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,

    pub function: FunctionSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Token accounting reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub messages: &'a [ChatMessage],

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [ToolSchema]>,
}

/// Response body from `/chat/completions` (the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// The top choice of a completion, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Whether the model is waiting on tool results.
    ///
    /// Some deployments report `stop` while still emitting calls, so the
    /// presence of calls decides, not `finish_reason`.
    pub fn has_pending_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }

    /// The assistant turn to record in the transcript.
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::assistant(self.content.clone(), self.tool_calls.clone())
    }
}

impl TryFrom<ChatCompletionResponse> for ChatResponse {
    type Error = LlmError;

    fn try_from(response: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let usage = response.usage;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        Ok(Self {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
            finish_reason: choice.finish_reason,
            usage,
        })
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the conversation (and the tools the model may call) and return
    /// the top choice.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ChatResponse, LlmError>;
}
