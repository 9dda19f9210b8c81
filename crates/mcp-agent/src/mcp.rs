//! MCP tool access over the streamable-HTTP transport.
//!
//! The protocol runs on `rmcp`. This module sets up the HTTP client (Basic
//! auth, connect timeout), bounds every exchange with a timeout, and flattens
//! tool results into the text handed back to the model.

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::Client;
use rmcp::model::{CallToolRequestParams, CallToolResult, Tool};
use rmcp::service::{ClientInitializeError, RunningService};
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::{RoleClient, ServiceError, ServiceExt};
use serde_json::{Map, Value};
use settings::BasicAuth;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors talking to an MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Credentials could not be encoded as a header.
    #[error("Invalid MCP credentials: {0}")]
    Credentials(#[from] InvalidHeaderValue),

    /// The HTTP client could not be built.
    #[error("Failed to create MCP HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The initialize request never reached the server.
    #[error("MCP server unreachable: {0}")]
    Unreachable(String),

    /// The server answered the handshake with something unusable.
    #[error("MCP handshake failed: {0}")]
    Handshake(ClientInitializeError),

    #[error("MCP {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// JSON-RPC error returned for a request.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Transport or protocol failure after the handshake.
    #[error("MCP request failed: {0}")]
    Service(ServiceError),
}

impl From<ClientInitializeError> for McpError {
    fn from(error: ClientInitializeError) -> Self {
        match error {
            ClientInitializeError::TransportError { error, .. } => {
                McpError::Unreachable(error.error.to_string())
            }
            other => McpError::Handshake(other),
        }
    }
}

impl From<ServiceError> for McpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::McpError(data) => McpError::Rpc {
                code: data.code.0,
                message: data.message.into_owned(),
            },
            other => McpError::Service(other),
        }
    }
}

/// Text outcome of a `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl From<CallToolResult> for ToolOutput {
    fn from(result: CallToolResult) -> Self {
        let mut parts: Vec<String> = result
            .content
            .iter()
            .map(|item| match item.as_text() {
                Some(text) => text.text.clone(),
                None => serde_json::to_string(item).unwrap_or_default(),
            })
            .collect();
        if parts.is_empty() {
            if let Some(structured) = &result.structured_content {
                parts.push(structured.to_string());
            }
        }

        Self {
            text: parts.join("\n"),
            is_error: result.is_error.unwrap_or(false),
        }
    }
}

/// An initialized MCP client session.
pub struct McpConnection {
    service: RunningService<RoleClient, ()>,
    timeout: Duration,
}

impl McpConnection {
    /// Run the `initialize` handshake against `url`.
    pub async fn connect(
        url: &str,
        auth: Option<&BasicAuth>,
        timeout: Duration,
    ) -> Result<Self, McpError> {
        let client = http_client(auth, timeout)?;
        let transport = StreamableHttpClientTransport::with_client(
            client,
            StreamableHttpClientTransportConfig::with_uri(url.to_string()),
        );

        let service = tokio::time::timeout(timeout, ().serve(transport))
            .await
            .map_err(|_| McpError::Timeout {
                operation: "handshake",
                timeout,
            })??;

        if let Some(server) = service.peer_info() {
            info!(
                server = %server.server_info.name,
                version = %server.server_info.version,
                protocol = %server.protocol_version,
                "MCP session initialized"
            );
        }

        Ok(Self { service, timeout })
    }

    /// List every tool, following pagination cursors.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        let tools = self
            .bounded("tools/list", self.service.list_all_tools())
            .await?;
        debug!(count = tools.len(), "Listed MCP tools");
        Ok(tools)
    }

    /// Invoke a tool and flatten its content to text.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput, McpError> {
        let params = CallToolRequestParams {
            meta: None,
            name: name.to_string().into(),
            arguments: Some(arguments),
            task: None,
        };
        let result = self.bounded("tools/call", self.service.call_tool(params)).await?;
        Ok(ToolOutput::from(result))
    }

    /// End the session. Failures are only logged.
    pub async fn close(self) {
        if let Err(e) = self.service.cancel().await {
            warn!(error = %e, "MCP session close failed");
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, McpError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| McpError::Timeout {
                operation,
                timeout: self.timeout,
            })?
            .map_err(McpError::from)
    }
}

impl std::fmt::Debug for McpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpConnection")
            .field("closed", &self.service.is_closed())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the MCP endpoint.
///
/// Credentials ride as a default header so every request the transport
/// makes (POST, GET stream, DELETE) carries them. No total timeout is set
/// because the server-push stream stays open for the whole session.
fn http_client(auth: Option<&BasicAuth>, connect_timeout: Duration) -> Result<Client, McpError> {
    let mut headers = HeaderMap::new();
    if let Some(auth) = auth {
        headers.insert(AUTHORIZATION, basic_auth_header(auth)?);
    }

    Ok(Client::builder()
        .default_headers(headers)
        .connect_timeout(connect_timeout)
        .build()?)
}

fn basic_auth_header(auth: &BasicAuth) -> Result<HeaderValue, InvalidHeaderValue> {
    let credentials = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", auth.username, auth.password));
    let mut value = HeaderValue::from_str(&format!("Basic {}", credentials))?;
    value.set_sensitive(true);
    Ok(value)
}
