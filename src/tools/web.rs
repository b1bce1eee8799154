//! Web search through a search-grounded model deployment.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{describe_outcome, Tool};
use crate::llm::{completions_url, ChatCompletionResponse, ChatResponse};

/// Ask a model with Google Search grounding and return its answer.
pub struct WebSearch {
    url: String,
    api_key: String,
    client: Client,
}

impl WebSearch {
    pub fn new(endpoint: &str, deployment: &str, api_key: &str) -> Self {
        Self::with_client(endpoint, deployment, api_key, Client::new())
    }

    pub fn with_client(endpoint: &str, deployment: &str, api_key: &str, client: Client) -> Self {
        Self {
            url: completions_url(endpoint, deployment),
            api_key: api_key.to_string(),
            client,
        }
    }

    async fn search(&self, args: &Value) -> anyhow::Result<String> {
        let request = match args.get("request") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => anyhow::bail!("Missing 'request' argument"),
            Some(other) => other.to_string(),
        };

        tracing::info!("Searching the web: {}", request);

        let body = json!({
            "messages": [{"role": "user", "content": request}],
            "tools": [{
                "type": "static_function",
                "static_function": {
                    "name": "google_search",
                    "description": "Grounding with Google Search",
                    "configuration": {}
                }
            }]
        });

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
            anyhow::bail!("HTTP {}: {}", status.as_u16(), text);
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let answer = ChatResponse::try_from(parsed)?;
        Ok(answer.content.unwrap_or_default())
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search_tool"
    }

    fn description(&self) -> &str {
        "Search the web for current information about people, companies or topics. Returns a summarized answer grounded in search results."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "request": {
                    "type": "string",
                    "description": "The search query or question to search for on the web"
                }
            },
            "required": ["request"]
        })
    }

    async fn execute(&self, args: Value) -> String {
        describe_outcome(self.search(&args).await, "Error while searching the web: ")
    }
}
