//! Agent capability traits.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::{AgentRun, ChatMessage};

/// A one-shot agent parameterised by its per-call dependencies.
///
/// `D` carries request-scoped context (dates, identifiers) that the agent
/// folds into its instructions. Object-safe, so handlers can hold an
/// `Arc<dyn Agent<D>>` and tests can swap in a stub.
#[async_trait]
pub trait Agent<D: Sync>: Send + Sync {
    /// Run the agent on `prompt` and return its final text output.
    async fn run(&self, prompt: &str, deps: &D) -> Result<String, AgentError>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// A conversational agent that continues from earlier messages.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Run one turn. The returned [`AgentRun::messages`] is the full
    /// transcript to pass back as `history` next turn.
    async fn chat(&self, prompt: &str, history: &[ChatMessage]) -> Result<AgentRun, AgentError>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}
