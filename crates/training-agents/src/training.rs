//! Conversational training agent.

use agent_core::{async_trait, AgentError, AgentRun, ChatAgent, ChatMessage};
use mcp_agent::{McpAgent, McpAgentConfig};
use settings::Settings;
use tracing::debug;

/// Static instructions for the chat agent.
pub const TRAINING_INSTRUCTIONS: &str = "You are a training assistant. You can access the user's \
training data through MCP tools. If the question needs data you do not have, say so and suggest \
what you can provide. When getting activities or wellness for a date range, do not get more than \
14 days worth data. If user request can be satisfied with one date, do so.";

/// Multi-turn assistant over the user's training data.
pub struct TrainingAgent {
    inner: McpAgent,
    instructions: Vec<String>,
}

impl TrainingAgent {
    /// Wrap an existing runtime.
    pub fn new(inner: McpAgent) -> Self {
        Self {
            inner,
            instructions: vec![TRAINING_INSTRUCTIONS.to_string()],
        }
    }

    /// Build from process settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let inner = McpAgent::new(McpAgentConfig::from_settings(settings))?;
        Ok(Self::new(inner))
    }

    /// Get the underlying runtime.
    pub fn runtime(&self) -> &McpAgent {
        &self.inner
    }
}

#[async_trait]
impl ChatAgent for TrainingAgent {
    async fn chat(&self, prompt: &str, history: &[ChatMessage]) -> Result<AgentRun, AgentError> {
        debug!(history = history.len(), "Training agent turn");
        self.inner.run(&self.instructions, history, prompt).await
    }

    fn name(&self) -> &str {
        "TrainingAgent"
    }
}
