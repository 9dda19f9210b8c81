//! Application state shared across handlers.

use std::sync::Arc;

use agent_core::{Agent, ChatAgent};
use signal_sender::SignalSender;
use training_agents::SummaryDeps;

use crate::dates::{Clock, SystemClock};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Writes `/summary` output.
    pub summary_agent: Arc<dyn Agent<SummaryDeps>>,
    /// Answers `/chat` turns.
    pub chat_agent: Arc<dyn ChatAgent>,
    /// Present only when Signal is configured.
    pub signal_sender: Option<Arc<dyn SignalSender>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state using the system clock.
    pub fn new(
        summary_agent: Arc<dyn Agent<SummaryDeps>>,
        chat_agent: Arc<dyn ChatAgent>,
        signal_sender: Option<Arc<dyn SignalSender>>,
    ) -> Self {
        Self {
            summary_agent,
            chat_agent,
            signal_sender,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
