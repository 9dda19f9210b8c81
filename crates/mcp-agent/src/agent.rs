//! McpAgent implementation: completions API + MCP tools.

use std::time::Instant;

use agent_core::{AgentError, AgentRun, ChatMessage, ToolCall};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ToolDefinition};
use crate::config::McpAgentConfig;
use crate::mcp::{McpConnection, McpError};

/// An agent that answers with help from tools on an MCP server.
///
/// Each run opens its own MCP session, offers the server's tools to the
/// model, and keeps calling the model until it answers without requesting
/// tools or `max_tool_rounds` is reached.
pub struct McpAgent {
    client: Client,
    config: McpAgentConfig,
}

impl McpAgent {
    /// Create a new McpAgent with the given configuration.
    pub fn new(config: McpAgentConfig) -> Result<Self, AgentError> {
        if config.model.is_empty() {
            return Err(AgentError::Configuration("model is not set".to_string()));
        }
        if config.mcp_url.is_empty() {
            return Err(AgentError::Configuration("MCP server URL is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AgentError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "McpAgent initialized with model: {}, mcp: {}, max_tool_rounds: {}",
            config.model, config.mcp_url, config.max_tool_rounds
        );

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &McpAgentConfig {
        &self.config
    }

    /// Run one turn.
    ///
    /// `instructions` are joined into a single system message. `history` is
    /// the transcript from earlier turns (without a system message).
    pub async fn run(
        &self,
        instructions: &[String],
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<AgentRun, AgentError> {
        let started = Instant::now();
        let session = McpConnection::connect(
            &self.config.mcp_url,
            self.config.mcp_auth.as_ref(),
            self.config.request_timeout,
        )
        .await
        .map_err(tool_server_error)?;

        let result = self.run_in_session(&session, instructions, history, prompt).await;
        session.close().await;

        match &result {
            Ok(run) => info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                messages = run.messages.len(),
                "Agent run complete"
            ),
            Err(e) => warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Agent run failed"
            ),
        }

        result
    }

    async fn run_in_session(
        &self,
        session: &McpConnection,
        instructions: &[String],
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<AgentRun, AgentError> {
        let tools: Vec<ToolDefinition> = session
            .list_tools()
            .await
            .map_err(tool_server_error)?
            .iter()
            .map(ToolDefinition::from)
            .collect();

        let system = build_system_prompt(instructions);
        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(prompt));

        for round in 1..=self.config.max_tool_rounds {
            let mut request_messages = Vec::with_capacity(messages.len() + 1);
            if let Some(system) = &system {
                request_messages.push(ChatMessage::system(system.clone()));
            }
            request_messages.extend(messages.iter().cloned());

            let completion = self.chat_completion(request_messages, &tools).await?;
            let choice = completion
                .choices
                .into_iter()
                .next()
                .ok_or(AgentError::EmptyResponse)?;

            let tool_calls = choice.message.tool_calls.unwrap_or_default();
            if tool_calls.is_empty() {
                let output = choice.message.content.ok_or(AgentError::EmptyResponse)?;
                messages.push(ChatMessage::assistant(output.clone()));
                return Ok(AgentRun { output, messages });
            }

            debug!(
                round,
                calls = tool_calls.len(),
                finish_reason = ?choice.finish_reason,
                "Model requested tools"
            );
            messages.push(ChatMessage::assistant_tool_calls(
                choice.message.content,
                tool_calls.clone(),
            ));

            for call in &tool_calls {
                let content = self.execute_tool(session, call).await?;
                messages.push(ChatMessage::tool_result(&call.id, content));
            }
        }

        Err(AgentError::ToolLoopExhausted(self.config.max_tool_rounds))
    }

    /// Run a tool call. Tool-level failures become text for the model;
    /// only transport failures abort the run.
    async fn execute_tool(&self, session: &McpConnection, call: &ToolCall) -> Result<String, AgentError> {
        let name = &call.function.name;
        let arguments = match parse_arguments(&call.function.arguments) {
            Ok(arguments) => arguments,
            Err(message) => {
                warn!(tool = %name, "Invalid tool arguments: {}", message);
                return Ok(format!("Error: {}", message));
            }
        };

        let started = Instant::now();
        match session.call_tool(name, arguments).await {
            Ok(output) => {
                debug!(
                    tool = %name,
                    is_error = output.is_error,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Tool call finished"
                );
                if output.is_error {
                    Ok(format!("Error: {}", output.text))
                } else {
                    Ok(output.text)
                }
            }
            Err(McpError::Rpc { code, message }) => {
                warn!(tool = %name, code, "Tool call rejected: {}", message);
                Ok(format!("Error: {}", message))
            }
            Err(e) => Err(tool_server_error(e)),
        }
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: &[ToolDefinition],
    ) -> Result<ChatCompletionResponse, AgentError> {
        let url = self.config.completions_url();
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            tools: tools.to_vec(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to model API: {} messages", request.messages.len());

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AgentError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(AgentError::Model(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(AgentError::Model(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Model(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }
}

impl std::fmt::Debug for McpAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpAgent")
            .field("model", &self.config.model)
            .field("mcp_url", &self.config.mcp_url)
            .finish()
    }
}

fn build_system_prompt(instructions: &[String]) -> Option<String> {
    let parts: Vec<&str> = instructions
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn parse_arguments(raw: &str) -> Result<Map<String, Value>, String> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("tool arguments must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid tool arguments: {}", e)),
    }
}

fn tool_server_error(error: McpError) -> AgentError {
    match error {
        McpError::Unreachable(cause) => {
            AgentError::Network(format!("MCP server unreachable: {}", cause))
        }
        other => AgentError::ToolServer(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_system_prompt_joins_non_empty() {
        let instructions = vec![
            "Base.".to_string(),
            "  ".to_string(),
            "Dates.".to_string(),
        ];
        assert_eq!(build_system_prompt(&instructions).as_deref(), Some("Base.\n\nDates."));
        assert!(build_system_prompt(&[]).is_none());
    }

    #[test]
    fn test_parse_arguments() {
        assert!(parse_arguments("").unwrap().is_empty());
        let args = parse_arguments(r#"{"date":"2025-03-09"}"#).unwrap();
        assert_eq!(args["date"], "2025-03-09");
        assert!(parse_arguments("[1]").is_err());
        assert!(parse_arguments("{nope").is_err());
    }

    #[test]
    fn test_new_rejects_missing_model() {
        let config = McpAgentConfig::builder().mcp_url("http://localhost/mcp").build();
        assert!(matches!(McpAgent::new(config), Err(AgentError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_missing_mcp_url() {
        let config = McpAgentConfig::builder().model("gpt-4o").build();
        assert!(matches!(McpAgent::new(config), Err(AgentError::Configuration(_))));
    }
}
