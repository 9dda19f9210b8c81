//! Date-bounded summary agent.

use agent_core::{async_trait, Agent, AgentError};
use chrono::NaiveDate;
use mcp_agent::{McpAgent, McpAgentConfig};
use settings::Settings;

/// Static part of the summary agent's instructions.
pub const SUMMARY_BASE_INSTRUCTIONS: &str = "You are a training assistant. You can access the \
user's training data through MCP tools. Get data for the provided dates only. Create concise \
summaries.";

/// Fixed user prompt for summary runs.
pub const SUMMARY_PROMPT: &str = "Summarize my activity and fitness development.";

/// Date bounds passed to a summary run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryDeps {
    pub activity_start_date: NaiveDate,
    pub activity_end_date: NaiveDate,
    pub fitness_start_date: NaiveDate,
    pub fitness_end_date: NaiveDate,
}

impl SummaryDeps {
    /// Instruction fragment that pins the agent to these dates.
    pub fn date_range_instructions(&self) -> String {
        format!(
            "Use activity data from date {} to {}. Use fitness data from {} to {}.",
            self.activity_start_date,
            self.activity_end_date,
            self.fitness_start_date,
            self.fitness_end_date
        )
    }
}

/// Summary writer bound to the training-data MCP server.
pub struct SummaryAgent {
    inner: McpAgent,
}

impl SummaryAgent {
    /// Wrap an existing runtime.
    pub fn new(inner: McpAgent) -> Self {
        Self { inner }
    }

    /// Build from process settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let inner = McpAgent::new(McpAgentConfig::from_settings(settings))?;
        Ok(Self::new(inner))
    }
}

#[async_trait]
impl Agent<SummaryDeps> for SummaryAgent {
    async fn run(&self, prompt: &str, deps: &SummaryDeps) -> Result<String, AgentError> {
        let instructions = [
            SUMMARY_BASE_INSTRUCTIONS.to_string(),
            deps.date_range_instructions(),
        ];
        let run = self.inner.run(&instructions, &[], prompt).await?;
        Ok(run.output)
    }

    fn name(&self) -> &str {
        "SummaryAgent"
    }
}
