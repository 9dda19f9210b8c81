//! Error types for agent runs.

use thiserror::Error;

/// Errors that can occur while running an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A remote service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The model API answered with an error.
    #[error("model error: {0}")]
    Model(String),

    /// The tool server failed outside of a tool result.
    #[error("tool server error: {0}")]
    ToolServer(String),

    /// The model kept requesting tools past the round limit.
    #[error("tool loop exceeded {0} rounds")]
    ToolLoopExhausted(usize),

    /// The model returned no usable output.
    #[error("empty response from model")]
    EmptyResponse,
}
