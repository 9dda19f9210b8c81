//! Tool-calling agent runtime.
//!
//! [`McpAgent`] drives an OpenAI-compatible chat-completions API and forwards
//! every tool call the model makes to an MCP server reached over the
//! streamable-HTTP transport (via `rmcp`).
//!
//! # Features
//!
//! - Fresh MCP session per run (`initialize` → `tools/list` → `tools/call`)
//! - Tool results flattened to text for the model
//! - Optional Basic-auth on MCP calls, bearer token on model calls
//! - Bounded tool-calling loop
//!
//! # Usage
//!
//! ```rust,no_run
//! use mcp_agent::{McpAgent, McpAgentConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = McpAgentConfig::builder()
//!         .model("gpt-4o-mini")
//!         .mcp_url("http://localhost:9000/mcp")
//!         .build();
//!     let agent = McpAgent::new(config)?;
//!
//!     let run = agent
//!         .run(&["You are a training assistant.".to_string()], &[], "How did I sleep?")
//!         .await?;
//!     println!("{}", run.output);
//!     Ok(())
//! }
//! ```

mod agent;
mod api_types;
mod config;
pub mod mcp;

pub use agent::McpAgent;
pub use config::{McpAgentConfig, McpAgentConfigBuilder};
pub use mcp::{McpConnection, McpError, ToolOutput};

// Re-export agent-core types for convenience
pub use agent_core::{async_trait, Agent, AgentError, AgentRun, ChatAgent, ChatMessage};
