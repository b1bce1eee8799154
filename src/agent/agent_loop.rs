//! Core agent loop implementation.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::llm::{ChatMessage, DialClient, LlmClient, LlmError, ToolCall};
use crate::tools::{self, RegistryError, ToolRegistry};

use super::transcript::Transcript;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Tool-call budget exceeded: model still requested tools after {max_rounds} rounds")]
    ToolBudgetExceeded { max_rounds: usize },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Drives the request / execute tools / request again cycle.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    max_tool_rounds: usize,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry, max_tool_rounds: usize) -> Self {
        Self {
            llm,
            tools,
            max_tool_rounds,
        }
    }

    /// Wire the DIAL client and the default tool set from configuration.
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let http = config.http_client()?;
        let llm = DialClient::with_client(
            &config.dial_endpoint,
            &config.deployment,
            &config.api_key,
            http.clone(),
        )?;
        let tools = ToolRegistry::from_tools(tools::default_tools(config, http))?;

        info!("Initialized DIAL client with endpoint: {}", llm.url());
        info!("Available tools: {:?}", tools.names());

        Ok(Self::new(Arc::new(llm), tools, config.max_tool_rounds))
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the model until it answers without requesting tools.
    ///
    /// Every assistant and tool turn produced along the way is appended to
    /// `transcript`, including the final assistant turn, which is also
    /// returned. On error the transcript keeps whatever was appended before
    /// the failure, and every tool call it contains has been answered.
    pub async fn get_completion(
        &self,
        transcript: &mut Transcript,
    ) -> Result<ChatMessage, AgentError> {
        let tool_schemas = self.tools.get_tool_schemas();
        let mut rounds = 0;

        loop {
            debug!("Agent request {} ({} turns)", rounds + 1, transcript.len());

            let response = self
                .llm
                .chat_completion(transcript.messages(), Some(tool_schemas.as_slice()))
                .await?;

            if let Some(usage) = &response.usage {
                debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "Completion usage"
                );
            }

            let assistant = response.to_message();
            transcript.push(assistant.clone());

            if !response.has_pending_tool_calls() {
                return Ok(assistant);
            }

            let calls = assistant.requested_tool_calls();
            if rounds >= self.max_tool_rounds {
                warn!(
                    "Model requested {} more tool call(s) after {} rounds; stopping",
                    calls.len(),
                    rounds
                );
                transcript.extend(calls.iter().map(|call| {
                    ChatMessage::tool(
                        call.id.clone(),
                        call.function.name.clone(),
                        format!(
                            "Error: tool-call budget of {} rounds exceeded; call not executed",
                            self.max_tool_rounds
                        ),
                    )
                }));
                return Err(AgentError::ToolBudgetExceeded {
                    max_rounds: self.max_tool_rounds,
                });
            }

            let mut tool_turns = Vec::with_capacity(calls.len());
            for call in calls {
                tool_turns.push(self.execute_tool_call(call).await);
            }
            transcript.extend(tool_turns);
            rounds += 1;
        }
    }

    /// Execute a single tool call, always producing a tool turn.
    async fn execute_tool_call(&self, call: &ToolCall) -> ChatMessage {
        let name = &call.function.name;
        info!("Calling tool: {}", name);

        let result = match decode_arguments(&call.function.arguments) {
            Ok(args) => self.tools.execute(name, args).await,
            Err(e) => format!("Error: invalid JSON arguments for '{}': {}", name, e),
        };

        debug!("FUNCTION '{}'\n{}", name, result);
        ChatMessage::tool(call.id.clone(), name.clone(), result)
    }
}

/// Parse the model's argument payload. An empty payload means no arguments.
fn decode_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw)
}
