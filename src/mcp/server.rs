//! MCP server lifecycle and request routing.
//!
//! 1. **Initialisation**: `initialize` reports capabilities and server info
//! 2. **Operation**: `tools/list` and `tools/call` go to the [`ToolRegistry`]
//! 3. **Shutdown**: EOF or a termination signal ends the loop
//!
//! Requests are handled strictly one at a time, in arrival order.

use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::artifacts::Artifacts;
use crate::mcp::protocol::{
    parse_message, IncomingMessage, InitializeParams, JsonRpcError, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, RequestId, ToolCallParams, MCP_PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::mcp::transport::{LineTransport, StdioTransport};
use crate::tools::ToolRegistry;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize answered; tools are already available.
    Initialising,
    /// The client confirmed with `notifications/initialized`.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for the initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: &'static str,
    /// Server version.
    pub version: &'static str,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// One outgoing line: a result or an error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// A successful response.
    Success(JsonRpcResponse),
    /// An error response.
    Failure(JsonRpcError),
}

impl From<Result<JsonRpcResponse, JsonRpcError>> for Reply {
    fn from(result: Result<JsonRpcResponse, JsonRpcError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(error) => Self::Failure(error),
        }
    }
}

/// The MCP server.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Registered tools.
    registry: ToolRegistry,
    /// Artifact repositories handed to every tool.
    artifacts: Artifacts,
}

impl McpServer {
    /// Creates a server exposing the built-in tools.
    #[must_use]
    pub fn new(artifacts: Artifacts) -> Self {
        Self::with_registry(ToolRegistry::builtin(), artifacts)
    }

    /// Creates a server exposing `registry`.
    #[must_use]
    pub const fn with_registry(registry: ToolRegistry, artifacts: Artifacts) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            protocol_version: None,
            registry,
            artifacts,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Serves stdin/stdout until EOF or a termination signal.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Serves `transport` until EOF, without signal handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve<R, W>(&mut self, transport: &mut LineTransport<R, W>) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let line_result = transport.read_line().await;
            if self.handle_transport_result(line_result, transport).await? {
                return Ok(());
            }
        }
    }

    #[cfg(unix)]
    async fn run_with_shutdown<R, W>(
        &mut self,
        transport: &mut LineTransport<R, W>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    if self.handle_transport_result(line_result, transport).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    #[cfg(windows)]
    async fn run_with_shutdown<R, W>(
        &mut self,
        transport: &mut LineTransport<R, W>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    if self.handle_transport_result(line_result, transport).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from a transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result<R, W>(
        &mut self,
        line_result: std::io::Result<Option<String>>,
        transport: &mut LineTransport<R, W>,
    ) -> std::io::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(line) = line_result? else {
            tracing::info!("Input closed, shutting down");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        if let Some(reply) = self.handle_line(&line).await {
            transport.write_message(&reply).await?;
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles one input line, returning the reply to send, if any.
    pub async fn handle_line(&mut self, line: &str) -> Option<Reply> {
        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => Some(self.handle_request(req).await),
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                None
            }
            Err(error) => {
                tracing::warn!(code = error.error.code, "Rejected malformed message");
                Some(Reply::Failure(error))
            }
        }
    }

    async fn handle_request(&mut self, req: JsonRpcRequest) -> Reply {
        tracing::debug!(id = %req.id, method = %req.method, "Handling request");
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(&req),
            "tools/list" => self.handle_tools_list(&req),
            "tools/call" => self.handle_tools_call(&req).await,
            "ping" => Ok(Self::handle_ping(&req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };
        response.into()
    }

    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            self.state = ServerState::Running;
        } else {
            tracing::debug!(method = %notif.method, "Ignoring notification");
        }
    }

    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request_with(
                req.id.clone(),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = req.parse_params()?;
        let client = params.client_info.as_ref().map_or("unknown", |c| c.name.as_str());
        tracing::info!(
            client,
            requested_version = %params.protocol_version,
            "Client initialising"
        );

        self.protocol_version = Some(MCP_PROTOCOL_VERSION.to_string());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;

        let result = json!({
            "tools": self.registry.list(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    async fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;

        let params: ToolCallParams = req.parse_params()?;
        let result = self
            .registry
            .call(&self.artifacts, &params.name, &params.arguments)
            .await;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Tools are available as soon as `initialize` has been answered.
    fn require_initialised(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        match self.state {
            ServerState::Initialising | ServerState::Running => Ok(()),
            ServerState::AwaitingInit | ServerState::ShuttingDown => Err(
                JsonRpcError::invalid_request_with(id.clone(), "Server not initialised"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::artifacts::ArtifactLayout;
    use crate::mcp::protocol::ErrorCode;

    fn server() -> McpServer {
        let layout = ArtifactLayout::from_root(std::path::Path::new("/nonexistent-design-root"));
        McpServer::new(Artifacts::new(&layout))
    }

    async fn reply(server: &mut McpServer, line: &str) -> Value {
        let reply = server.handle_line(line).await.unwrap();
        serde_json::to_value(reply).unwrap()
    }

    const INIT: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test"}}}"#;

    #[test]
    fn server_initial_state() {
        let server = server();
        assert_eq!(server.state(), ServerState::AwaitingInit);
        assert!(server.protocol_version().is_none());
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let mut server = server();
        let response = reply(&mut server, INIT).await;
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "unmessme-mcp-server");
        assert!(response["result"]["capabilities"]["tools"].is_object());
        assert_eq!(server.state(), ServerState::Initialising);

        let again = reply(&mut server, INIT).await;
        assert_eq!(again["error"]["code"], ErrorCode::InvalidRequest.code());
    }

    #[tokio::test]
    async fn tools_require_initialize() {
        let mut server = server();
        let response = reply(&mut server, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        assert_eq!(response["error"]["message"], "Server not initialised");

        reply(&mut server, INIT).await;
        let response = reply(&mut server, r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#).await;
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn initialized_notification_has_no_reply() {
        let mut server = server();
        reply(&mut server, INIT).await;
        let none = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(none.is_none());
        assert_eq!(server.state(), ServerState::Running);
    }

    #[tokio::test]
    async fn ping_unknown_method_and_parse_error() {
        let mut server = server();
        let pong = reply(&mut server, r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#).await;
        assert_eq!(pong["result"], json!({}));
        assert_eq!(pong["id"], "p");

        let unknown = reply(&mut server, r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#).await;
        assert_eq!(unknown["error"]["code"], ErrorCode::MethodNotFound.code());

        let garbage = reply(&mut server, "{oops").await;
        assert_eq!(garbage["error"]["code"], ErrorCode::ParseError.code());
        assert!(garbage["id"].is_null());
    }

    #[tokio::test]
    async fn tools_call_without_params_is_invalid_params() {
        let mut server = server();
        reply(&mut server, INIT).await;
        let response = reply(&mut server, r#"{"jsonrpc":"2.0","id":5,"method":"tools/call"}"#).await;
        assert_eq!(response["error"]["code"], ErrorCode::InvalidParams.code());
    }

    #[tokio::test]
    async fn tools_call_unknown_tool_is_error_envelope() {
        let mut server = server();
        reply(&mut server, INIT).await;
        let response = reply(
            &mut server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"nope"}}"#,
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("ToolNotFound"));
        assert!(text.contains("nope"));
    }
}
