//! Agents for the training assistant.
//!
//! - [`TrainingAgent`] answers free-form questions in a multi-turn chat.
//! - [`SummaryAgent`] writes an activity and fitness summary for the date
//!   ranges carried in [`SummaryDeps`].
//!
//! Both are thin wrappers around [`mcp_agent::McpAgent`]: they differ only
//! in their instructions.

mod summary;
mod training;

pub use summary::{SummaryAgent, SummaryDeps, SUMMARY_BASE_INSTRUCTIONS, SUMMARY_PROMPT};
pub use training::{TrainingAgent, TRAINING_INSTRUCTIONS};
