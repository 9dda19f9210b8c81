//! Signal gateway HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use settings::Settings;
use tracing::{debug, info, warn};

use crate::config::SignalConfig;
use crate::error::SignalError;
use crate::types::{SendRequest, SendResult};

/// Capability to deliver a text message through Signal.
///
/// This trait is object-safe and can be used with `Arc<dyn SignalSender>`.
#[async_trait]
pub trait SignalSender: Send + Sync {
    /// Send `message` and return the gateway's timestamp, if it gave one.
    async fn send(&self, message: &str) -> Result<SendResult, SignalError>;
}

/// [`SignalSender`] backed by the gateway's REST API.
#[derive(Clone)]
pub struct HttpSignalSender {
    http: Client,
    config: SignalConfig,
}

impl HttpSignalSender {
    /// Create a sender for the given configuration.
    pub fn new(config: SignalConfig) -> Result<Self, SignalError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SignalError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    async fn post(&self, url: &str, request: &SendRequest) -> Result<Response, SignalError> {
        let mut builder = self.http.post(url).json(request);
        if let Some(auth) = &self.config.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        builder.send().await.map_err(SignalError::Unavailable)
    }
}

#[async_trait]
impl SignalSender for HttpSignalSender {
    async fn send(&self, message: &str) -> Result<SendResult, SignalError> {
        let url = self.config.send_url();
        let request = SendRequest::note_to_self(&self.config.number, message);

        debug!(url = %url, chars = message.len(), "Sending Signal message");

        let mut response = self.post(&url, &request).await?;
        if response.status().is_server_error() {
            warn!(status = response.status().as_u16(), "Signal API server error, retrying once");
            response = self.post(&url, &request).await?;
        }

        let status = response.status();
        if status != StatusCode::CREATED {
            warn!(status = status.as_u16(), "Signal API rejected message");
            return Err(SignalError::Status(status.as_u16()));
        }

        let body = response.bytes().await.unwrap_or_default();
        let result = SendResult::from_body(&body);
        info!(timestamp = ?result.timestamp, "Signal message sent");

        Ok(result)
    }
}

impl std::fmt::Debug for HttpSignalSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSignalSender")
            .field("config", &self.config)
            .finish()
    }
}

/// Build a sender from settings, or `None` when Signal is not configured.
pub fn build_signal_sender(
    settings: &Settings,
) -> Result<Option<Arc<dyn SignalSender>>, SignalError> {
    match &settings.signal {
        Some(signal) => {
            let sender = HttpSignalSender::new(SignalConfig::from(signal))?;
            Ok(Some(Arc::new(sender)))
        }
        None => Ok(None),
    }
}
