//! Configuration for the Signal gateway client.

use std::time::Duration;

use settings::{BasicAuth, SignalSettings};

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for talking to the Signal REST gateway.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Base URL of the gateway (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Account phone number, used as sender and sole recipient.
    pub number: String,
    /// Optional basic-auth credentials.
    pub auth: Option<BasicAuth>,
    /// Timeout applied to each attempt.
    pub timeout: Duration,
}

impl SignalConfig {
    /// Create a configuration without authentication.
    pub fn new(base_url: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            number: number.into(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach basic-auth credentials.
    pub fn with_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the send endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/v2/send", self.base_url.trim_end_matches('/'))
    }
}

impl From<&SignalSettings> for SignalConfig {
    fn from(settings: &SignalSettings) -> Self {
        Self {
            base_url: settings.api_url.clone(),
            number: settings.number.clone(),
            auth: settings.auth.clone(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
