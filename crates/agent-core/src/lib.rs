//! Core traits and types shared by the training assistant agents.
//!
//! This crate defines:
//!
//! - [`Agent`] - one-shot capability `run(prompt, deps) -> text`
//! - [`ChatAgent`] - multi-turn capability that carries message history
//! - [`ChatMessage`] / [`ToolCall`] - chat transcript types
//! - [`AgentError`] - error type for agent runs
//!
//! # Example
//!
//! ```rust
//! use agent_core::{async_trait, Agent, AgentError};
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl Agent<()> for Canned {
//!     async fn run(&self, _prompt: &str, _deps: &()) -> Result<String, AgentError> {
//!         Ok("All good.".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Canned"
//!     }
//! }
//! ```

mod error;
mod message;
mod trait_def;

pub use error::AgentError;
pub use message::{AgentRun, ChatMessage, FunctionCall, Role, ToolCall};
pub use trait_def::{Agent, ChatAgent};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
