//! Tools module - capabilities the model can call.
//!
//! Each tool publishes a name, a description and a JSON schema for its
//! arguments, and turns a call into text. Tools never fail outward: errors are
//! folded into the returned text so every call still gets a tool turn.

mod user_client;
mod user_models;
mod user_tools;
mod web;

pub use user_client::{UserClient, UserService};
pub use user_models::{Address, CreditCard, UserCreate, UserSearch, UserUpdate};
pub use user_tools::{CreateUser, DeleteUser, GetUserById, SearchUsers, UpdateUser};
pub use web::WebSearch;

#[cfg(test)]
pub(crate) use user_tools::tests::MemoryUsers;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::llm::{FunctionSchema, ToolSchema};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// A capability the model may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name the model calls this tool by.
    fn name(&self) -> &str;

    /// Guides the model on when to call the tool.
    fn description(&self) -> &str;

    /// JSON schema of the accepted arguments.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. Failures come back as text prefixed with the operation.
    async fn execute(&self, args: Value) -> String;
}

/// Fold a fallible tool body into its result text.
pub(crate) fn describe_outcome(result: anyhow::Result<String>, error_prefix: &str) -> String {
    match result {
        Ok(output) => output,
        Err(e) => format!("{}{:#}", error_prefix, e),
    }
}

/// The agent's tool set: web search plus the five user-record tools.
///
/// All tools share `http`, so the configured timeout applies to each of them.
pub fn default_tools(config: &Config, http: reqwest::Client) -> Vec<Arc<dyn Tool>> {
    let users: Arc<dyn UserService> =
        Arc::new(UserClient::with_client(&config.user_service_url, http.clone()));

    vec![
        Arc::new(WebSearch::with_client(
            &config.dial_endpoint,
            &config.web_search_deployment,
            &config.api_key,
            http,
        )),
        Arc::new(GetUserById::new(users.clone())),
        Arc::new(SearchUsers::new(users.clone())),
        Arc::new(CreateUser::new(users.clone())),
        Arc::new(UpdateUser::new(users.clone())),
        Arc::new(DeleteUser::new(users)),
    ]
}

/// What the model is told about a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn to_schema(&self) -> ToolSchema {
        ToolSchema {
            schema_type: "function".to_string(),
            function: FunctionSchema {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameters.clone(),
            },
        }
    }
}

/// Name-keyed set of tools, built once at startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of tools.
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look a tool up by name.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool by name. Unknown names yield `Unknown function: <name>`.
    pub async fn execute(&self, name: &str, args: Value) -> String {
        match self.resolve(name) {
            Some(tool) => tool.execute(args).await,
            None => format!("Unknown function: {}", name),
        }
    }

    /// Descriptors in registration order.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    /// Wire schemas for every tool, in registration order.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.list_tools().iter().map(ToolDescriptor::to_schema).collect()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument."
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }

        async fn execute(&self, args: Value) -> String {
            let result = args["text"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("Missing 'text' argument"));
            describe_outcome(result, "Error while echoing: ")
        }
    }

    struct Noop(&'static str);

    #[async_trait]
    impl Tool for Noop {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Does nothing."
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _args: Value) -> String {
            String::new()
        }
    }

    #[test]
    fn resolve_returns_same_instance() {
        let registry = ToolRegistry::from_tools(vec![Arc::new(Echo)]).unwrap();
        let first = registry.resolve("echo").unwrap();
        let second = registry.resolve("echo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ToolRegistry::from_tools(vec![Arc::new(Echo), Arc::new(Echo)]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTool(ref n) if n == "echo"));
    }

    #[test]
    fn debug_lists_tool_names_in_order() {
        let registry =
            ToolRegistry::from_tools(vec![Arc::new(Echo), Arc::new(Noop("noop"))]).unwrap();
        let printed = format!("{:?}", registry);
        assert_eq!(printed, r#"ToolRegistry { tools: ["echo", "noop"] }"#);
    }

    #[test]
    fn schemas_follow_registration_order() {
        let registry = ToolRegistry::from_tools(vec![
            Arc::new(Noop("zeta")),
            Arc::new(Echo),
            Arc::new(Noop("alpha")),
        ])
        .unwrap();

        let names: Vec<_> = registry
            .get_tool_schemas()
            .into_iter()
            .map(|s| s.function.name)
            .collect();
        assert_eq!(names, vec!["zeta", "echo", "alpha"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn schema_wire_shape() {
        let registry = ToolRegistry::from_tools(vec![Arc::new(Echo)]).unwrap();
        let schema = serde_json::to_value(&registry.get_tool_schemas()[0]).unwrap();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "echo");
        assert_eq!(schema["function"]["parameters"]["required"], json!(["text"]));
    }

    #[test]
    fn default_tool_set() {
        let config = Config::new(
            "key".to_string(),
            "http://127.0.0.1:1".to_string(),
            "http://127.0.0.1:2".to_string(),
        );
        let http = config.http_client().unwrap();
        let registry = ToolRegistry::from_tools(default_tools(&config, http)).unwrap();
        assert_eq!(
            registry.names(),
            [
                "web_search_tool",
                "get_user_by_id",
                "search_users",
                "add_user",
                "update_user",
                "delete_user"
            ]
        );
    }

    #[tokio::test]
    async fn unknown_function_is_text_not_error() {
        let registry = ToolRegistry::new();
        assert_eq!(
            registry.execute("launch_rockets", json!({})).await,
            "Unknown function: launch_rockets"
        );
    }

    #[tokio::test]
    async fn tool_errors_are_prefixed() {
        let registry = ToolRegistry::from_tools(vec![Arc::new(Echo)]).unwrap();
        assert_eq!(registry.execute("echo", json!({"text": "hi"})).await, "hi");
        assert_eq!(
            registry.execute("echo", json!({})).await,
            "Error while echoing: Missing 'text' argument"
        );
    }
}
