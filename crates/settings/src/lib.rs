//! Process-wide settings loaded once from the environment.
//!
//! [`Settings::from_env`] reads the variables below (after an optional `.env`
//! file has been loaded with [`load_dotenv`]) and fails fast when a required
//! one is missing. The resulting value is immutable and handed by reference
//! to every component that needs it.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MODEL` | Model identifier (optional `openai:` prefix) | (required) |
//! | `MCP_SERVER_URL` | MCP streamable-HTTP endpoint | (required) |
//! | `MCP_BASIC_AUTH_USERNAME` | MCP basic-auth user | none |
//! | `MCP_BASIC_AUTH_PASSWORD` | MCP basic-auth password | none |
//! | `LLM_API_URL` | OpenAI-compatible API base URL | `https://api.openai.com/v1` |
//! | `LLM_API_KEY` | Bearer token (falls back to `OPENAI_API_KEY`) | none |
//! | `AGENT_MAX_TOOL_ROUNDS` | Tool-calling round limit | `8` |
//! | `SIGNAL_API_URL` | Signal REST gateway base URL | none |
//! | `SIGNAL_NUMBER` | Sender/recipient phone number | none |
//! | `SIGNAL_BASIC_AUTH_USERNAME` | Signal basic-auth user | none |
//! | `SIGNAL_BASIC_AUTH_PASSWORD` | Signal basic-auth password | none |
//! | `API_ADDR` | HTTP bind address | `127.0.0.1:8000` |

use std::env;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1";

/// Default HTTP bind address.
pub const DEFAULT_API_ADDR: &str = "127.0.0.1:8000";

/// Default limit on model/tool round trips per agent run.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required variables are unset or empty.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A variable is present but cannot be parsed.
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    /// The `.env` file could not be read.
    #[error("Failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// A username/password pair for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build a pair only when both halves are present.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signal gateway settings. Only present when both URL and number are set.
#[derive(Debug, Clone)]
pub struct SignalSettings {
    /// Base URL of the Signal REST gateway.
    pub api_url: String,
    /// Phone number used as both sender and recipient.
    pub number: String,
    /// Optional basic-auth credentials for the gateway.
    pub auth: Option<BasicAuth>,
}

/// Immutable settings for the whole process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Model name sent to the completion API.
    pub model: String,
    /// OpenAI-compatible API base URL.
    pub llm_api_url: String,
    /// Bearer token for the completion API.
    pub llm_api_key: Option<String>,
    /// MCP server endpoint.
    pub mcp_server_url: String,
    /// Optional MCP basic-auth credentials.
    pub mcp_auth: Option<BasicAuth>,
    /// Upper bound on tool-calling rounds per agent run.
    pub max_tool_rounds: usize,
    /// Signal gateway settings, if configured.
    pub signal: Option<SignalSettings>,
    /// HTTP bind address.
    pub api_addr: SocketAddr,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model = var("MODEL");
        let mcp_server_url = var("MCP_SERVER_URL");

        let mut missing = Vec::new();
        if model.is_none() {
            missing.push("MODEL");
        }
        if mcp_server_url.is_none() {
            missing.push("MCP_SERVER_URL");
        }
        let (Some(model), Some(mcp_server_url)) = (model, mcp_server_url) else {
            return Err(ConfigError::Missing(missing));
        };

        let max_tool_rounds = match var("AGENT_MAX_TOOL_ROUNDS") {
            Some(value) => match value.parse::<usize>() {
                Ok(rounds) if rounds > 0 => rounds,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "AGENT_MAX_TOOL_ROUNDS",
                        value,
                    })
                }
            },
            None => DEFAULT_MAX_TOOL_ROUNDS,
        };

        let api_addr_raw = var("API_ADDR").unwrap_or_else(|| DEFAULT_API_ADDR.to_string());
        let api_addr = api_addr_raw
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "API_ADDR",
                value: api_addr_raw.clone(),
            })?;

        let signal = match (var("SIGNAL_API_URL"), var("SIGNAL_NUMBER")) {
            (Some(api_url), Some(number)) => Some(SignalSettings {
                api_url,
                number,
                auth: BasicAuth::from_parts(
                    var("SIGNAL_BASIC_AUTH_USERNAME"),
                    var("SIGNAL_BASIC_AUTH_PASSWORD"),
                ),
            }),
            _ => None,
        };

        let settings = Self {
            model,
            llm_api_url: var("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            llm_api_key: var("LLM_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            mcp_server_url,
            mcp_auth: BasicAuth::from_parts(
                var("MCP_BASIC_AUTH_USERNAME"),
                var("MCP_BASIC_AUTH_PASSWORD"),
            ),
            max_tool_rounds,
            signal,
            api_addr,
        };

        debug!(
            model = %settings.model,
            mcp_server_url = %settings.mcp_server_url,
            signal_configured = settings.signal.is_some(),
            "Loaded settings"
        );

        Ok(settings)
    }

    /// Model name with any `openai:` provider prefix removed.
    pub fn model_name(&self) -> &str {
        self.model.strip_prefix("openai:").unwrap_or(&self.model)
    }
}

/// Load a `.env` file into the process environment.
///
/// With no explicit path a missing `.env` in the working directory is not an
/// error. An explicit path must exist.
pub fn load_dotenv(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }
    Ok(())
}

/// Read a variable, treating empty or whitespace-only values as unset.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
