//! Configuration management for the user agent.
//!
//! Configuration is read from environment variables (a `.env` file in the
//! working directory is loaded first, if present):
//! - `DIAL_API_KEY` - Required. API key for the DIAL model proxy.
//! - `DIAL_ENDPOINT` - Optional. Base URL of the proxy. Defaults to `https://ai-proxy.lab.epam.com`.
//! - `DIAL_DEPLOYMENT` - Optional. Chat deployment driving the agent. Defaults to `gpt-4o`.
//! - `WEB_SEARCH_DEPLOYMENT` - Optional. Search-grounded deployment. Defaults to `gemini-2.5-pro`.
//! - `USER_SERVICE_URL` - Optional. User-record REST service. Defaults to `http://localhost:8041`.
//! - `MAX_TOOL_ROUNDS` - Optional. Tool rounds allowed per exchange. Defaults to `10`.
//! - `HTTP_TIMEOUT_SECS` - Optional. Transport timeout for every HTTP call. Unset means none.

use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_DIAL_ENDPOINT: &str = "https://ai-proxy.lab.epam.com";
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
pub const DEFAULT_WEB_SEARCH_DEPLOYMENT: &str = "gemini-2.5-pro";
pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:8041";
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// DIAL API key
    pub api_key: String,

    /// DIAL proxy base URL (no trailing slash)
    pub dial_endpoint: String,

    /// Deployment used for the conversation itself
    pub deployment: String,

    /// Deployment used by the web search tool
    pub web_search_deployment: String,

    /// User-record service base URL (no trailing slash)
    pub user_service_url: String,

    /// Maximum number of tool-execution rounds per top-level exchange
    pub max_tool_rounds: usize,

    /// Transport timeout applied to every HTTP client
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `DIAL_API_KEY` is not set or
    /// empty, and `ConfigError::InvalidValue` for malformed URLs or numbers.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DIAL_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DIAL_API_KEY".to_string()))?;

        let dial_endpoint = parse_base_url(
            "DIAL_ENDPOINT",
            lookup("DIAL_ENDPOINT").unwrap_or_else(|| DEFAULT_DIAL_ENDPOINT.to_string()),
        )?;

        let deployment =
            lookup("DIAL_DEPLOYMENT").unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());

        let web_search_deployment = lookup("WEB_SEARCH_DEPLOYMENT")
            .unwrap_or_else(|| DEFAULT_WEB_SEARCH_DEPLOYMENT.to_string());

        let user_service_url = parse_base_url(
            "USER_SERVICE_URL",
            lookup("USER_SERVICE_URL").unwrap_or_else(|| DEFAULT_USER_SERVICE_URL.to_string()),
        )?;

        let max_tool_rounds = lookup("MAX_TOOL_ROUNDS")
            .map(|v| {
                v.trim()
                    .parse::<usize>()
                    .map_err(|e| {
                        ConfigError::InvalidValue("MAX_TOOL_ROUNDS".to_string(), format!("{}", e))
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_TOOL_ROUNDS);
        if max_tool_rounds == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_TOOL_ROUNDS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let http_timeout = lookup("HTTP_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        ConfigError::InvalidValue("HTTP_TIMEOUT_SECS".to_string(), format!("{}", e))
                    })
            })
            .transpose()?;

        Ok(Self {
            api_key,
            dial_endpoint,
            deployment,
            web_search_deployment,
            user_service_url,
            max_tool_rounds,
            http_timeout,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, dial_endpoint: String, user_service_url: String) -> Self {
        Self {
            api_key,
            dial_endpoint: dial_endpoint.trim_end_matches('/').to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            web_search_deployment: DEFAULT_WEB_SEARCH_DEPLOYMENT.to_string(),
            user_service_url: user_service_url.trim_end_matches('/').to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            http_timeout: None,
        }
    }

    /// Build a `reqwest` client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the TLS backend cannot be initialised.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn parse_base_url(var: &str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/').to_string();
    let parsed = Url::parse(&trimmed)
        .map_err(|e| ConfigError::InvalidValue(var.to_string(), format!("{}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(ConfigError::InvalidValue(
            var.to_string(),
            format!("unsupported scheme: {}", other),
        )),
    }
}
