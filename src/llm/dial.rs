//! DIAL chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatResponse, LlmClient,
    LlmError, ToolSchema,
};

/// Chat completions URL for a deployment behind the proxy at `endpoint`.
pub fn completions_url(endpoint: &str, deployment: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions",
        endpoint.trim_end_matches('/'),
        deployment
    )
}

/// Talks to one deployment of a DIAL proxy.
pub struct DialClient {
    url: String,
    api_key: String,
    client: Client,
}

impl DialClient {
    /// Create a client for `deployment`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingApiKey` if `api_key` is empty.
    pub fn new(endpoint: &str, deployment: &str, api_key: &str) -> Result<Self, LlmError> {
        Self::with_client(endpoint, deployment, api_key, Client::new())
    }

    /// Same as [`DialClient::new`] with a preconfigured HTTP client.
    pub fn with_client(
        endpoint: &str,
        deployment: &str,
        api_key: &str,
        client: Client,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        Ok(Self {
            url: completions_url(endpoint, deployment),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LlmClient for DialClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ChatResponse, LlmError> {
        let body = ChatCompletionRequest {
            messages,
            tools: tools.filter(|t| !t.is_empty()),
        };

        debug!(url = %self.url, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        ChatResponse::try_from(parsed)
    }
}
