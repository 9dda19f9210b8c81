//! Configuration for McpAgent.

use std::time::Duration;

use settings::{BasicAuth, Settings, DEFAULT_LLM_API_URL, DEFAULT_MAX_TOOL_ROUNDS};

/// Configuration for McpAgent.
#[derive(Debug, Clone)]
pub struct McpAgentConfig {
    /// OpenAI-compatible API base URL (without `/chat/completions`).
    pub api_url: String,

    /// Optional bearer token for the model API.
    pub api_key: Option<String>,

    /// Model name to use.
    pub model: String,

    /// MCP streamable-HTTP endpoint.
    pub mcp_url: String,

    /// Optional Basic-auth credentials for the MCP endpoint.
    pub mcp_auth: Option<BasicAuth>,

    /// Maximum number of completion calls per run.
    pub max_tool_rounds: usize,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Timeout applied to each HTTP call.
    pub request_timeout: Duration,
}

impl Default for McpAgentConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_LLM_API_URL.to_string(),
            api_key: None,
            model: String::new(),
            mcp_url: String::new(),
            mcp_auth: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            max_tokens: None,
            temperature: None,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl McpAgentConfig {
    /// Derive configuration from process settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_url: settings.llm_api_url.clone(),
            api_key: settings.llm_api_key.clone(),
            model: settings.model_name().to_string(),
            mcp_url: settings.mcp_server_url.clone(),
            mcp_auth: settings.mcp_auth.clone(),
            max_tool_rounds: settings.max_tool_rounds,
            ..Self::default()
        }
    }

    /// Create a new config builder.
    pub fn builder() -> McpAgentConfigBuilder {
        McpAgentConfigBuilder::default()
    }

    /// Chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for McpAgentConfig.
#[derive(Debug, Default)]
pub struct McpAgentConfigBuilder {
    config: McpAgentConfig,
}

impl McpAgentConfigBuilder {
    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the MCP endpoint.
    pub fn mcp_url(mut self, url: impl Into<String>) -> Self {
        self.config.mcp_url = url.into();
        self
    }

    /// Set MCP Basic-auth credentials.
    pub fn mcp_auth(mut self, auth: BasicAuth) -> Self {
        self.config.mcp_auth = Some(auth);
        self
    }

    /// Set the tool round limit.
    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.config.max_tool_rounds = rounds;
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the per-call timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> McpAgentConfig {
        self.config
    }
}
